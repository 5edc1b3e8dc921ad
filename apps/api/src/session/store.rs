use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::models::session::Session;

struct StoredSession {
    session: Session,
    touched: Instant,
}

/// Process-local session map. Holding the write lock across a whole turn keeps
/// turns within one session serialized. Sessions idle for longer than `ttl`
/// are dropped on the next insert or sweep.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, StoredSession>>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn insert(&self, session: Session) {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        evict_stale(&mut sessions, now, self.ttl);
        sessions.insert(
            session.id,
            StoredSession {
                session,
                touched: now,
            },
        );
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .filter(|stored| stored.touched.elapsed() <= self.ttl)
            .map(|stored| stored.session.clone())
    }

    /// Runs `f` against the stored session under the write lock and refreshes its TTL.
    /// Returns `None` when no live session has this id.
    pub async fn update<T>(&self, id: Uuid, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions
            .get_mut(&id)
            .filter(|stored| stored.touched.elapsed() <= self.ttl)?;
        stored.touched = Instant::now();
        Some(f(&mut stored.session))
    }

    /// Drops every expired session. Returns how many were removed.
    pub async fn evict_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        evict_stale(&mut sessions, Instant::now(), self.ttl)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn evict_stale(sessions: &mut HashMap<Uuid, StoredSession>, now: Instant, ttl: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, stored| now.duration_since(stored.touched) <= ttl);
    let evicted = before - sessions.len();
    if evicted > 0 {
        debug!(evicted, remaining = sessions.len(), "expired sessions evicted");
    }
    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Domain;

    const TTL: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_insert_then_get() {
        let store = SessionStore::new(TTL);
        let session = Session::new(Domain::Image);
        let id = session.id;
        store.insert(session).await;
        assert_eq!(store.get(id).await.unwrap().id, id);
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_get_unknown_is_none() {
        assert!(SessionStore::new(TTL).get(Uuid::new_v4()).await.is_none());
    }

    #[tokio::test]
    async fn test_update_mutates_in_place() {
        let store = SessionStore::new(TTL);
        let session = Session::new(Domain::Dev);
        let id = session.id;
        store.insert(session).await;

        let turn = store
            .update(id, |s| {
                s.turn += 1;
                s.turn
            })
            .await;
        assert_eq!(turn, Some(1));
        assert_eq!(store.get(id).await.unwrap().turn, 1);
        assert!(store.update(Uuid::new_v4(), |s| s.turn).await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_updates_are_serialized() {
        let store = SessionStore::new(TTL);
        let session = Session::new(Domain::Video);
        let id = session.id;
        store.insert(session).await;

        let mut handles = Vec::new();
        for _ in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.update(id, |s| s.turn += 1).await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(store.get(id).await.unwrap().turn, 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_session_dropped_on_next_insert() {
        let store = SessionStore::new(TTL);
        let stale = Session::new(Domain::Image);
        let stale_id = stale.id;
        store.insert(stale).await;

        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        assert!(store.get(stale_id).await.is_none());

        let fresh = Session::new(Domain::Image);
        let fresh_id = fresh.id;
        store.insert(fresh).await;
        assert_eq!(store.count().await, 1);
        assert!(store.get(fresh_id).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_keeps_recently_touched_sessions() {
        let store = SessionStore::new(TTL);
        let idle = Session::new(Domain::Dev);
        let active = Session::new(Domain::Dev);
        let (idle_id, active_id) = (idle.id, active.id);
        store.insert(idle).await;
        store.insert(active).await;

        tokio::time::advance(Duration::from_secs(40)).await;
        store.update(active_id, |s| s.turn += 1).await;
        tokio::time::advance(Duration::from_secs(40)).await;

        assert_eq!(store.evict_expired().await, 1);
        assert!(store.get(idle_id).await.is_none());
        assert_eq!(store.get(active_id).await.unwrap().turn, 1);
        assert!(store.update(idle_id, |s| s.turn).await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_sessions_do_not_accumulate() {
        let store = SessionStore::new(TTL);
        for _ in 0..1000 {
            store.insert(Session::new(Domain::Video)).await;
        }
        assert_eq!(store.count().await, 1000);
        tokio::time::advance(TTL * 2).await;
        store.insert(Session::new(Domain::Video)).await;
        assert_eq!(store.count().await, 1);
    }
}
