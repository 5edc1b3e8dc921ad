//! Prompt quality rubric — five pass/fail criteria worth 100 points in total.
//!
//! Pluggable behind `PromptScorer` (carried in `AppState` as `Arc<dyn PromptScorer>`);
//! `RubricPromptScorer` is the deterministic default.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::ScoringError;

pub const MAX_SCORE: u32 = 100;
pub const DEFAULT_MAX_PROMPT_LENGTH: usize = 500;

// English words are bounded by non-ASCII-word characters, so a Hangul particle
// glued to them ("this를", "no텍스트") still counts as a word edge.
const DEMONSTRATIVE_PATTERN: &str = r"이것|그것|저것|이거|그거|저거|(?:^|[^a-z0-9_])(?:this|that)(?:[^a-z0-9_]|$)";
const VAGUE_PATTERN: &str = r"애매|모호|대충|아무거나|적당히|알아서|(?:^|[^a-z0-9_])(?:vague|ambiguous|whatever)(?:[^a-z0-9_]|$)";
const QUANTIFIABLE_PATTERN: &str = r"비율|형식|포맷|길이|사양|스펙|조건|상업|권리|해상도|ratio|format|length|spec|condition|commercial|rights";
const INFEASIBLE_PATTERN: &str = r"불가능|미정|모르겠|모름|(?:^|[^a-z0-9_])(?:impossible|undetermined|tbd)(?:[^a-z0-9_]|$)";
const EXCLUSION_PATTERN: &str = r"제외|금지|없이|말고|빼고|피해|피하|하지 마|않|(?:^|[^a-z0-9_])(?:no|not)(?:[^a-z0-9_]|$)|without|avoid|exclude";
const CONSTRAINT_KEYWORD_PATTERN: &str = r"사양|스펙|권리|비율|라이선스|spec|rights|ratio|license";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Criterion {
    Clarity,
    Specificity,
    Format,
    Executability,
    ConstraintsQuality,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Clarity,
        Criterion::Specificity,
        Criterion::Format,
        Criterion::Executability,
        Criterion::ConstraintsQuality,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Criterion::Clarity => "clarity",
            Criterion::Specificity => "specificity",
            Criterion::Format => "format",
            Criterion::Executability => "executability",
            Criterion::ConstraintsQuality => "constraints_quality",
        }
    }

    pub fn weight(&self) -> u32 {
        match self {
            Criterion::Clarity => 20,
            Criterion::Specificity => 25,
            Criterion::Format => 20,
            Criterion::Executability => 20,
            Criterion::ConstraintsQuality => 15,
        }
    }

    /// Corrective hint emitted when the criterion fails.
    pub fn hint(&self) -> &'static str {
        match self {
            Criterion::Clarity => "'이것', '그것' 같은 지시어나 '애매하게', '대충' 같은 표현 대신 대상을 명확히 적어 주세요.",
            Criterion::Specificity => "숫자나 비율, 형식, 길이, 사용 조건처럼 측정 가능한 정보를 추가해 주세요.",
            Criterion::Format => "프롬프트를 한국어로, 정해진 길이 이내로 간결하게 정리해 주세요.",
            Criterion::Executability => "'불가능', '미정'처럼 실행을 막는 표현을 없애고 확정된 요구사항으로 바꿔 주세요.",
            Criterion::ConstraintsQuality => "제외할 요소나 사양, 권리, 비율 같은 제약 조건을 명시해 주세요.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    /// 0 – 100
    pub total: u32,
    /// Criterion name → full weight when passed, 0 when failed.
    pub criteria_scores: BTreeMap<String, u32>,
    pub max_score: u32,
    pub improvement_suggestions: Vec<String>,
}

/// Scores a draft prompt. Implement this to swap the rubric without touching handlers.
pub trait PromptScorer: Send + Sync {
    fn evaluate(&self, prompt: &str, domain: &str) -> QualityReport;
}

/// Deterministic keyword rubric.
#[derive(Debug)]
pub struct RubricPromptScorer {
    max_length: usize,
    demonstratives: Regex,
    vague_markers: Regex,
    quantifiable: Regex,
    infeasible_markers: Regex,
    exclusion_markers: Regex,
    constraint_keywords: Regex,
}

impl RubricPromptScorer {
    pub fn new(max_length: usize) -> Result<Self, ScoringError> {
        Ok(Self {
            max_length,
            demonstratives: compile("clarity.demonstratives", DEMONSTRATIVE_PATTERN)?,
            vague_markers: compile("clarity.vague", VAGUE_PATTERN)?,
            quantifiable: compile("specificity", QUANTIFIABLE_PATTERN)?,
            infeasible_markers: compile("executability", INFEASIBLE_PATTERN)?,
            exclusion_markers: compile("constraints_quality.exclusion", EXCLUSION_PATTERN)?,
            constraint_keywords: compile("constraints_quality.keywords", CONSTRAINT_KEYWORD_PATTERN)?,
        })
    }

    /// Whether `text` passes `criterion`. Each criterion is judged independently.
    pub fn passes(&self, criterion: Criterion, text: &str) -> bool {
        let lowered = text.to_lowercase();
        match criterion {
            Criterion::Clarity => {
                !self.demonstratives.is_match(&lowered) && !self.vague_markers.is_match(&lowered)
            }
            Criterion::Specificity => {
                text.chars().any(|c| c.is_ascii_digit()) || self.quantifiable.is_match(&lowered)
            }
            Criterion::Format => {
                text.chars().count() <= self.max_length && text.chars().any(is_hangul)
            }
            Criterion::Executability => !self.infeasible_markers.is_match(&lowered),
            Criterion::ConstraintsQuality => {
                self.exclusion_markers.is_match(&lowered)
                    || self.constraint_keywords.is_match(&lowered)
            }
        }
    }
}

impl PromptScorer for RubricPromptScorer {
    fn evaluate(&self, prompt: &str, domain: &str) -> QualityReport {
        let mut criteria_scores = BTreeMap::new();
        let mut improvement_suggestions = Vec::new();
        let mut passed_weight = 0_u32;

        for criterion in Criterion::ALL {
            if self.passes(criterion, prompt) {
                passed_weight += criterion.weight();
                criteria_scores.insert(criterion.name().to_string(), criterion.weight());
            } else {
                criteria_scores.insert(criterion.name().to_string(), 0);
                improvement_suggestions.push(criterion.hint().to_string());
            }
        }

        let total = passed_weight.min(MAX_SCORE);
        debug!(total, domain, failed = improvement_suggestions.len(), "prompt evaluated");

        QualityReport {
            total,
            criteria_scores,
            max_score: MAX_SCORE,
            improvement_suggestions,
        }
    }
}

fn compile(key: &str, pattern: &str) -> Result<Regex, ScoringError> {
    Regex::new(pattern).map_err(|source| ScoringError::Pattern {
        key: key.to_string(),
        source,
    })
}

/// Hangul syllables, jamo, and compatibility jamo.
fn is_hangul(c: char) -> bool {
    matches!(c, '\u{AC00}'..='\u{D7A3}' | '\u{1100}'..='\u{11FF}' | '\u{3130}'..='\u{318F}')
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_PROMPT: &str = "고양이 수채화 일러스트, 16:9 비율, 텍스트와 워터마크 제외";

    fn scorer() -> RubricPromptScorer {
        RubricPromptScorer::new(DEFAULT_MAX_PROMPT_LENGTH).unwrap()
    }

    /// Digit and ratio keyword, but no exclusion marker.
    const NO_NEGATIVES_PROMPT: &str = "고양이 수채화 일러스트, 16:9 비율";

    /// `GOOD_PROMPT` padded with neutral Hangul to exactly `len` characters.
    fn padded(len: usize) -> String {
        padded_from(GOOD_PROMPT, len)
    }

    fn padded_from(base: &str, len: usize) -> String {
        let mut text = base.to_string();
        while text.chars().count() < len {
            text.push('가');
        }
        text
    }

    #[test]
    fn test_weights_sum_to_100() {
        let sum: u32 = Criterion::ALL.iter().map(|c| c.weight()).sum();
        assert_eq!(sum, MAX_SCORE);
    }

    #[test]
    fn test_all_criteria_pass_scores_100() {
        let report = scorer().evaluate(GOOD_PROMPT, "image");
        assert_eq!(report.total, 100);
        assert_eq!(report.max_score, 100);
        assert!(report.improvement_suggestions.is_empty());
        assert_eq!(report.criteria_scores["specificity"], 25);
    }

    #[test]
    fn test_all_criteria_fail_scores_0() {
        let report = scorer().evaluate("make this vague impossible thing", "image");
        assert_eq!(report.total, 0);
        assert_eq!(report.improvement_suggestions.len(), 5);
        assert!(report.criteria_scores.values().all(|s| *s == 0));
    }

    #[test]
    fn test_501_chars_fails_format_by_exactly_20() {
        let s = scorer();
        let at_limit = s.evaluate(&padded(500), "image");
        let over_limit = s.evaluate(&padded(501), "image");
        assert_eq!(at_limit.total, 100);
        assert_eq!(over_limit.total, 80);
        assert_eq!(over_limit.criteria_scores["format"], 0);
        assert_eq!(over_limit.improvement_suggestions, vec![Criterion::Format.hint()]);
    }

    #[test]
    fn test_501_chars_without_negatives_fails_format_by_exactly_20() {
        let s = scorer();
        let at_limit = padded_from(NO_NEGATIVES_PROMPT, 500);
        assert!(!s.exclusion_markers.is_match(&at_limit));
        assert!(s.passes(Criterion::ConstraintsQuality, &at_limit));

        let passing = s.evaluate(&at_limit, "image");
        let failing = s.evaluate(&padded_from(NO_NEGATIVES_PROMPT, 501), "image");
        assert_eq!(passing.total, 100);
        assert_eq!(failing.total, passing.total - 20);
        assert_eq!(failing.criteria_scores["format"], 0);
        assert_eq!(failing.criteria_scores["constraints_quality"], 15);
    }

    #[test]
    fn test_clarity_rejects_demonstratives_and_vague_words() {
        let s = scorer();
        assert!(!s.passes(Criterion::Clarity, "이것을 그려줘"));
        assert!(!s.passes(Criterion::Clarity, "대충 멋있게"));
        assert!(!s.passes(Criterion::Clarity, "draw that"));
        assert!(s.passes(Criterion::Clarity, "고양이를 그려줘"));
        // Word-bounded English: "thatch" is not a demonstrative.
        assert!(s.passes(Criterion::Clarity, "thatched roof cottage"));
    }

    #[test]
    fn test_english_markers_match_next_to_hangul_particles() {
        let s = scorer();
        assert!(!s.passes(Criterion::Clarity, "this를 그려줘"));
        assert!(!s.passes(Criterion::Clarity, "배경은 vague하게"));
        assert!(!s.passes(Criterion::Executability, "일정은 tbd입니다"));
        assert!(s.passes(Criterion::ConstraintsQuality, "no텍스트"));
        // Still word-bounded on the ASCII side.
        assert!(!s.passes(Criterion::ConstraintsQuality, "nothing 고양이"));
        assert!(s.passes(Criterion::Executability, "tbds"));
    }

    #[test]
    fn test_specificity_digit_or_keyword() {
        let s = scorer();
        assert!(s.passes(Criterion::Specificity, "고양이 2마리"));
        assert!(s.passes(Criterion::Specificity, "상업용 이미지"));
        assert!(s.passes(Criterion::Specificity, "PNG format"));
        assert!(!s.passes(Criterion::Specificity, "귀여운 고양이"));
    }

    #[test]
    fn test_format_requires_hangul() {
        let s = scorer();
        assert!(!s.passes(Criterion::Format, "a cute cat, 16:9"));
        assert!(s.passes(Criterion::Format, "귀여운 cat"));
    }

    #[test]
    fn test_format_respects_configured_length() {
        let s = RubricPromptScorer::new(10).unwrap();
        assert!(s.passes(Criterion::Format, "가나다라마바사아자차"));
        assert!(!s.passes(Criterion::Format, "가나다라마바사아자차카"));
    }

    #[test]
    fn test_executability_rejects_undetermined() {
        let s = scorer();
        assert!(!s.passes(Criterion::Executability, "배경은 미정"));
        assert!(!s.passes(Criterion::Executability, "TBD background"));
        assert!(s.passes(Criterion::Executability, "배경은 숲"));
    }

    #[test]
    fn test_constraints_exclusion_or_keyword() {
        let s = scorer();
        assert!(s.passes(Criterion::ConstraintsQuality, "사람은 제외"));
        assert!(s.passes(Criterion::ConstraintsQuality, "no text overlay"));
        assert!(s.passes(Criterion::ConstraintsQuality, "라이선스 확인된 폰트"));
        assert!(!s.passes(Criterion::ConstraintsQuality, "귀여운 고양이"));
    }

    #[test]
    fn test_one_hint_per_failed_criterion() {
        // Fails clarity on two counts but yields one clarity hint.
        let report = scorer().evaluate("이것 대충, 16:9 비율, 텍스트 제외", "image");
        assert_eq!(report.total, 80);
        assert_eq!(report.improvement_suggestions, vec![Criterion::Clarity.hint()]);
    }

    #[test]
    fn test_total_is_sum_of_passed_weights() {
        let s = scorer();
        for text in [GOOD_PROMPT, "귀여운 고양이", "draw that", "배경은 미정, 2개"] {
            let report = s.evaluate(text, "dev");
            let expected: u32 = Criterion::ALL
                .iter()
                .filter(|c| s.passes(**c, text))
                .map(|c| c.weight())
                .sum();
            assert_eq!(report.total, expected);
            assert_eq!(report.criteria_scores.values().sum::<u32>(), expected);
        }
    }

    #[test]
    fn test_empty_prompt_degrades_without_panicking() {
        let report = scorer().evaluate("", "unknown");
        // Only the absence-based criteria pass on empty text.
        assert_eq!(report.total, 40);
    }
}
