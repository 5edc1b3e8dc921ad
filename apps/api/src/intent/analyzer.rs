//! Intent analysis — weighted coverage of a domain's slots by the user's text.
//!
//! A slot counts as filled when any configured `FillStrategy` says so. The
//! default pair is keyword mentions OR the slot key itself appearing verbatim
//! (underscores read as spaces). Strategies are independent and OR-combined.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ScoringError;
use crate::intent::catalog::{SlotCatalog, SlotDefinition};
use crate::intent::mentions::{MentionExtractor, MentionMap};
use crate::models::domain::Domain;

/// Default score at which intent counts as complete even with slots missing.
pub const DEFAULT_COMPLETE_AT: u32 = 95;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStatus {
    pub filled: bool,
    pub weight: u32,
    /// Name of the first strategy that found evidence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filled_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentReport {
    /// 0 – 100
    pub intent_score: u32,
    pub slot_breakdown: BTreeMap<String, SlotStatus>,
    pub is_complete: bool,
    /// Unfilled keys in definition order.
    pub missing_slots: Vec<String>,
}

impl IntentReport {
    fn empty() -> Self {
        Self {
            intent_score: 0,
            slot_breakdown: BTreeMap::new(),
            is_complete: false,
            missing_slots: Vec::new(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fill strategies
// ────────────────────────────────────────────────────────────────────────────

/// Decides whether one slot has evidence in the combined, lower-cased text.
pub trait FillStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn is_filled(&self, slot: &SlotDefinition, blob: &str, mentions: &MentionMap) -> bool;
}

/// Filled when the mention extractor found at least one keyword for the slot.
pub struct KeywordMentionStrategy;

impl FillStrategy for KeywordMentionStrategy {
    fn name(&self) -> &'static str {
        "keyword_mention"
    }

    fn is_filled(&self, slot: &SlotDefinition, _blob: &str, mentions: &MentionMap) -> bool {
        mentions
            .get(slot.key)
            .map(|hits| !hits.is_empty())
            .unwrap_or(false)
    }
}

/// Filled when the slot key, underscores as spaces, appears verbatim.
pub struct VerbatimKeyStrategy;

impl FillStrategy for VerbatimKeyStrategy {
    fn name(&self) -> &'static str {
        "verbatim_key"
    }

    fn is_filled(&self, slot: &SlotDefinition, blob: &str, _mentions: &MentionMap) -> bool {
        blob.contains(&slot.key.replace('_', " "))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Analyzer
// ────────────────────────────────────────────────────────────────────────────

pub struct IntentAnalyzer {
    catalog: Arc<SlotCatalog>,
    extractor: MentionExtractor,
    strategies: Vec<Box<dyn FillStrategy>>,
    complete_at: u32,
}

impl IntentAnalyzer {
    /// Analyzer with the default keyword + verbatim strategies.
    pub fn new(catalog: Arc<SlotCatalog>, complete_at: u32) -> Result<Self, ScoringError> {
        Self::with_strategies(
            catalog,
            complete_at,
            vec![Box::new(KeywordMentionStrategy), Box::new(VerbatimKeyStrategy)],
        )
    }

    pub fn with_strategies(
        catalog: Arc<SlotCatalog>,
        complete_at: u32,
        strategies: Vec<Box<dyn FillStrategy>>,
    ) -> Result<Self, ScoringError> {
        let extractor = MentionExtractor::from_catalog(&catalog)?;
        Ok(Self {
            catalog,
            extractor,
            strategies,
            complete_at,
        })
    }

    pub fn analyze(&self, user_input: &str, answers: &[String], domain: Domain) -> IntentReport {
        let slots = self.catalog.slots_for(domain);
        self.score_slots(user_input, answers, slots)
    }

    pub fn extractor(&self) -> &MentionExtractor {
        &self.extractor
    }

    fn score_slots(
        &self,
        user_input: &str,
        answers: &[String],
        slots: &[SlotDefinition],
    ) -> IntentReport {
        if slots.is_empty() {
            return IntentReport::empty();
        }

        let blob = combine_text(user_input, answers);
        let mentions = self.extractor.extract(&blob);

        let mut slot_breakdown = BTreeMap::new();
        let mut missing_slots = Vec::new();
        let mut filled_weight = 0_u32;
        let mut total_weight = 0_u32;

        for slot in slots {
            let filled_by = self
                .strategies
                .iter()
                .find(|s| s.is_filled(slot, &blob, &mentions))
                .map(|s| s.name());
            let filled = filled_by.is_some();
            debug!(slot = slot.key, strategy = filled_by.unwrap_or("none"), "slot checked");

            total_weight += slot.weight;
            if filled {
                filled_weight += slot.weight;
            } else {
                missing_slots.push(slot.key.to_string());
            }
            slot_breakdown.insert(
                slot.key.to_string(),
                SlotStatus {
                    filled,
                    weight: slot.weight,
                    filled_by: filled_by.map(str::to_string),
                },
            );
        }

        let intent_score = percent_half_up(filled_weight, total_weight);
        let is_complete = missing_slots.is_empty() || intent_score >= self.complete_at;

        debug!(
            intent_score,
            is_complete,
            missing = missing_slots.len(),
            "intent analyzed"
        );

        IntentReport {
            intent_score,
            slot_breakdown,
            is_complete,
            missing_slots,
        }
    }
}

/// User input first, then answers in submission order, single-space joined, lower-cased.
pub fn combine_text(user_input: &str, answers: &[String]) -> String {
    std::iter::once(user_input)
        .chain(answers.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// round(100 × part / whole), half-up, 0 when `whole` is 0.
pub fn percent_half_up(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = u64::from(part.min(whole));
    let whole = u64::from(whole);
    ((200 * part + whole) / (2 * whole)) as u32
}
