use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::analyzer::IntentReport;
use crate::intent::questions::SlotQuestion;
use crate::models::domain::Domain;
use crate::quality::evaluator::QualityReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoneReason {
    /// Both scores reached their cutoffs.
    Converged,
    TurnLimit,
}

/// Turn-loop state. `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum SessionStatus {
    AwaitInput,
    AskQuestions,
    AwaitAnswers,
    Score,
    Done(DoneReason),
}

/// In-memory record of one refinement conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub domain: Domain,
    pub user_input: String,
    pub answers: Vec<String>,
    pub turn: u32,
    pub status: SessionStatus,
    pub draft_prompt: String,
    pub pending_questions: Vec<SlotQuestion>,
    pub last_intent: Option<IntentReport>,
    pub last_quality: Option<QualityReport>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(domain: Domain) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            domain,
            user_input: String::new(),
            answers: Vec::new(),
            turn: 0,
            status: SessionStatus::AwaitInput,
            draft_prompt: String::new(),
            pending_questions: Vec::new(),
            last_intent: None,
            last_quality: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.status, SessionStatus::Done(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_awaits_input() {
        let s = Session::new(Domain::Video);
        assert_eq!(s.status, SessionStatus::AwaitInput);
        assert_eq!(s.turn, 0);
        assert!(!s.is_done());
        assert!(s.last_intent.is_none());
    }

    #[test]
    fn test_status_serializes_with_reason() {
        let done = serde_json::to_value(SessionStatus::Done(DoneReason::TurnLimit)).unwrap();
        assert_eq!(done, serde_json::json!({"state": "done", "reason": "turn_limit"}));
        let waiting = serde_json::to_value(SessionStatus::AwaitAnswers).unwrap();
        assert_eq!(waiting, serde_json::json!({"state": "await_answers"}));
    }
}
