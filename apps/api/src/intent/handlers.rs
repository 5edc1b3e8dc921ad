//! Axum route handlers for the intent engine.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::intent::analyzer::IntentReport;
use crate::intent::catalog::SlotDefinition;
use crate::intent::questions::SlotQuestion;
use crate::models::domain::Domain;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeIntentRequest {
    pub user_input: String,
    #[serde(default)]
    pub answers: Vec<String>,
    pub domain: Domain,
}

#[derive(Debug, Deserialize)]
pub struct SelectQuestionsRequest {
    #[serde(default)]
    pub missing_slots: Vec<String>,
    pub domain: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DomainSlotsResponse {
    pub domain: Domain,
    pub slots: Vec<SlotDefinition>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/domains/:domain/slots
pub async fn handle_list_slots(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Result<Json<DomainSlotsResponse>, AppError> {
    let domain = Domain::parse(&domain)
        .ok_or_else(|| AppError::NotFound(format!("Domain '{domain}' not found")))?;

    Ok(Json(DomainSlotsResponse {
        domain,
        slots: state.catalog.slots_for(domain).to_vec(),
    }))
}

/// POST /api/v1/intent/analyze
pub async fn handle_analyze_intent(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeIntentRequest>,
) -> Json<IntentReport> {
    Json(
        state
            .analyzer
            .analyze(&request.user_input, &request.answers, request.domain),
    )
}

/// POST /api/v1/questions/select
///
/// `limit` defaults to the configured questions-per-turn.
pub async fn handle_select_questions(
    State(state): State<AppState>,
    Json(request): Json<SelectQuestionsRequest>,
) -> Json<Vec<SlotQuestion>> {
    let limit = request
        .limit
        .unwrap_or(state.config.max_questions_per_turn);
    Json(
        state
            .selector
            .select(&request.missing_slots, &request.domain, limit),
    )
}
