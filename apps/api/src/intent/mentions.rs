//! Mention extraction — purely lexical evidence that a slot was talked about.

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use crate::errors::ScoringError;
use crate::intent::catalog::SlotCatalog;

/// Slot key → distinct literal matches. Sparse: slots without evidence are absent.
pub type MentionMap = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug)]
struct MentionRule {
    key: &'static str,
    pattern: Regex,
}

/// Compiled keyword table covering every slot key across all domains.
#[derive(Debug)]
pub struct MentionExtractor {
    rules: Vec<MentionRule>,
}

impl MentionExtractor {
    pub fn from_catalog(catalog: &SlotCatalog) -> Result<Self, ScoringError> {
        let rules = catalog
            .keyword_patterns()
            .into_iter()
            .map(|(key, pattern)| {
                Regex::new(pattern)
                    .map(|pattern| MentionRule { key, pattern })
                    .map_err(|source| ScoringError::Pattern {
                        key: key.to_string(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Lower-cases `text` and collects every keyword hit per slot key.
    pub fn extract(&self, text: &str) -> MentionMap {
        let lowered = text.to_lowercase();
        let mut mentions = MentionMap::new();
        for rule in &self.rules {
            let hits: BTreeSet<String> = rule
                .pattern
                .find_iter(&lowered)
                .map(|m| m.as_str().to_string())
                .collect();
            if !hits.is_empty() {
                mentions.insert(rule.key.to_string(), hits);
            }
        }
        mentions
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(|r| r.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::Domain;

    fn extractor() -> MentionExtractor {
        MentionExtractor::from_catalog(&SlotCatalog::builtin().unwrap()).unwrap()
    }

    #[test]
    fn test_covers_every_catalog_key() {
        let catalog = SlotCatalog::builtin().unwrap();
        let ex = MentionExtractor::from_catalog(&catalog).unwrap();
        let keys: Vec<_> = ex.keys().collect();
        for domain in Domain::ALL {
            for slot in catalog.slots_for(domain) {
                assert!(keys.contains(&slot.key), "no rule for {}", slot.key);
            }
        }
    }

    #[test]
    fn test_dev_scenario_mentions() {
        let m = extractor().extract("사용자 인증이 필요한 웹 API를 만들고 싶어요");
        assert!(m["type"].contains("웹"));
        assert!(m["type"].contains("api"));
        assert!(m["security_auth"].contains("인증"));
        assert!(!m.contains_key("target_users"));
        assert!(!m.contains_key("core_features"));
        assert!(!m.contains_key("priority"));
        assert!(!m.contains_key("tech_pref_constraints"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let m = extractor().extract("A WATERCOLOR portrait");
        assert!(m["style"].contains("watercolor"));
    }

    #[test]
    fn test_map_is_sparse() {
        let m = extractor().extract("");
        assert!(m.is_empty());
    }

    #[test]
    fn test_matches_are_distinct() {
        let m = extractor().extract("웹, 웹, 그리고 또 웹");
        assert_eq!(m["type"].len(), 1);
    }

    #[test]
    fn test_rights_and_use_rights_fire_together() {
        let m = extractor().extract("상업적 용도로 쓸 거예요");
        assert!(m["rights"].contains("상업"));
        assert!(m["use_rights"].contains("상업"));
    }

    #[test]
    fn test_duration_needs_a_number_before_unit() {
        let ex = extractor();
        assert!(ex.extract("30초 분량의 광고").contains_key("duration"));
        assert!(ex.extract("15 seconds teaser").contains_key("duration"));
        assert!(!ex.extract("초록색 숲").contains_key("duration"));
    }
}
