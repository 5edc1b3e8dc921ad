use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::errors::ScoringError;
use crate::intent::analyzer::IntentAnalyzer;
use crate::intent::catalog::SlotCatalog;
use crate::intent::questions::QuestionSelector;
use crate::quality::evaluator::{PromptScorer, RubricPromptScorer};
use crate::session::refinement::{LoopLimits, RefinementLoop};
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub catalog: Arc<SlotCatalog>,
    pub analyzer: Arc<IntentAnalyzer>,
    pub selector: Arc<QuestionSelector>,
    /// Pluggable prompt scorer. Default: RubricPromptScorer.
    pub prompt_scorer: Arc<dyn PromptScorer>,
    pub refinement: Arc<RefinementLoop>,
    pub sessions: SessionStore,
}

impl AppState {
    /// Compiles the built-in rule tables and wires every engine component to one catalog.
    pub fn build(config: Config) -> Result<Self, ScoringError> {
        let catalog = Arc::new(SlotCatalog::builtin()?);
        let analyzer = Arc::new(IntentAnalyzer::new(catalog.clone(), config.intent_cutoff)?);
        let selector = Arc::new(QuestionSelector::new(catalog.clone()));
        let prompt_scorer: Arc<dyn PromptScorer> =
            Arc::new(RubricPromptScorer::new(config.max_prompt_length)?);
        let refinement = Arc::new(RefinementLoop::new(
            analyzer.clone(),
            selector.clone(),
            prompt_scorer.clone(),
            LoopLimits::from_config(&config),
        ));

        let sessions = SessionStore::new(Duration::from_secs(config.session_ttl_secs));

        Ok(AppState {
            config,
            catalog,
            analyzer,
            selector,
            prompt_scorer,
            refinement,
            sessions,
        })
    }
}
