//! Question selection — picks the next follow-up questions for missing slots.

use std::cmp::Reverse;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::intent::catalog::SlotCatalog;
use crate::models::domain::Domain;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotQuestion {
    pub key: String,
    pub question: String,
}

pub struct QuestionSelector {
    catalog: Arc<SlotCatalog>,
}

impl QuestionSelector {
    pub fn new(catalog: Arc<SlotCatalog>) -> Self {
        Self { catalog }
    }

    /// Ranks `missing` by question priority (ties keep definition order) and
    /// keeps at most `limit`. With nothing missing, ranks the domain's full slot list.
    pub fn select(&self, missing: &[String], domain: &str, limit: usize) -> Vec<SlotQuestion> {
        self.select_for(missing, Domain::parse(domain), limit)
    }

    pub fn select_for(
        &self,
        missing: &[String],
        domain: Option<Domain>,
        limit: usize,
    ) -> Vec<SlotQuestion> {
        let slots = domain.map(|d| self.catalog.slots_for(d)).unwrap_or(&[]);

        let candidates: Vec<String> = if missing.is_empty() {
            slots.iter().map(|s| s.key.to_string()).collect()
        } else {
            let mut unique: Vec<String> = Vec::with_capacity(missing.len());
            for key in missing {
                if !unique.contains(key) {
                    unique.push(key.clone());
                }
            }
            unique
        };

        let mut ranked: Vec<(u32, usize, String)> = candidates
            .into_iter()
            .map(|key| {
                let position = slots.iter().position(|s| s.key == key);
                let priority = position.map(|i| slots[i].priority).unwrap_or(0);
                // Unknown keys sort last and keep their caller order.
                (priority, position.unwrap_or(usize::MAX), key)
            })
            .collect();
        ranked.sort_by_key(|(priority, position, _)| (Reverse(*priority), *position));

        ranked
            .into_iter()
            .take(limit)
            .map(|(_, position, key)| {
                let question = slots
                    .get(position)
                    .map(|s| s.question.to_string())
                    .unwrap_or_else(|| self.catalog.question_for(&key));
                SlotQuestion { key, question }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> QuestionSelector {
        QuestionSelector::new(Arc::new(SlotCatalog::builtin().unwrap()))
    }

    fn keys(questions: &[SlotQuestion]) -> Vec<&str> {
        questions.iter().map(|q| q.key.as_str()).collect()
    }

    fn owned(keys: &[&str]) -> Vec<String> {
        keys.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_core_features_before_priority() {
        let q = selector().select(&owned(&["priority", "core_features"]), "dev", 2);
        assert_eq!(keys(&q), vec!["core_features", "priority"]);
        assert!(q[0].question.contains("핵심 기능"));
    }

    #[test]
    fn test_truncates_to_limit() {
        let missing = owned(&["target_users", "priority", "tech_pref_constraints", "security_auth"]);
        let q = selector().select(&missing, "dev", 2);
        assert_eq!(keys(&q), vec!["tech_pref_constraints", "target_users"]);
    }

    #[test]
    fn test_limit_zero_is_empty() {
        assert!(selector().select(&owned(&["type"]), "dev", 0).is_empty());
    }

    #[test]
    fn test_empty_missing_falls_back_to_full_slot_list() {
        let q = selector().select(&[], "image", 2);
        assert_eq!(keys(&q), vec!["subject", "style"]);
        let all = selector().select(&[], "video", 10);
        assert_eq!(all.len(), 7);
        assert_eq!(all[0].key, "subject");
        assert_eq!(all[6].key, "use_rights");
    }

    #[test]
    fn test_unknown_key_gets_generic_question() {
        let q = selector().select(&owned(&["mood", "subject"]), "image", 2);
        assert_eq!(keys(&q), vec!["subject", "mood"]);
        assert_eq!(q[1].question, "mood에 대해 더 자세히 알려주세요.");
    }

    #[test]
    fn test_unknown_domain_still_asks() {
        let q = selector().select(&owned(&["style", "tempo"]), "podcast", 2);
        assert_eq!(keys(&q), vec!["style", "tempo"]);
        // Registry text is still used for a key it knows.
        assert!(q[0].question.contains("스타일"));
    }

    #[test]
    fn test_unknown_domain_with_nothing_missing_is_empty() {
        assert!(selector().select(&[], "podcast", 2).is_empty());
    }

    #[test]
    fn test_duplicate_keys_are_asked_once() {
        let q = selector().select(&owned(&["type", "type", "priority"]), "dev", 3);
        assert_eq!(keys(&q), vec!["type", "priority"]);
    }

    #[test]
    fn test_domain_specific_question_text() {
        let image = selector().select(&owned(&["subject"]), "image", 1);
        let video = selector().select(&owned(&["subject"]), "video", 1);
        assert_ne!(image[0].question, video[0].question);
    }
}
