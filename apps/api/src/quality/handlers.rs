//! Axum route handler for prompt quality scoring.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::quality::evaluator::QualityReport;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EvaluatePromptRequest {
    pub prompt: String,
    #[serde(default)]
    pub domain: String,
}

/// POST /api/v1/prompt/evaluate
pub async fn handle_evaluate_prompt(
    State(state): State<AppState>,
    Json(request): Json<EvaluatePromptRequest>,
) -> Json<QualityReport> {
    Json(
        state
            .prompt_scorer
            .evaluate(&request.prompt, &request.domain),
    )
}
