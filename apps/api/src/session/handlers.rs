//! Axum route handlers for refinement sessions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::domain::Domain;
use crate::models::session::Session;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub domain: Domain,
    pub user_input: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    pub answers: Vec<String>,
}

/// POST /api/v1/sessions
///
/// Opens a session and returns it after turn-0 scoring, with the first questions pending.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<Session>), AppError> {
    let session = state
        .refinement
        .start(request.domain, &request.user_input)?;
    state.sessions.insert(session.clone()).await;
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions/:id/answers
///
/// Appends one round of answers and re-scores. Answering a finished session is a conflict.
pub async fn handle_submit_answers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SubmitAnswersRequest>,
) -> Result<Json<Session>, AppError> {
    let refinement = state.refinement.clone();
    let session = state
        .sessions
        .update(id, move |session| {
            refinement
                .submit_answers(session, request.answers)
                .map(|()| session.clone())
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))??;

    info!(session_id = %id, turn = session.turn, "answers recorded");
    Ok(Json(session))
}
