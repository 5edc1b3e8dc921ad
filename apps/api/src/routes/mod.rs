pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::intent::handlers as intent;
use crate::quality::handlers as quality;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Slot registry
        .route("/api/v1/domains/:domain/slots", get(intent::handle_list_slots))
        // Scoring engine
        .route("/api/v1/intent/analyze", post(intent::handle_analyze_intent))
        .route("/api/v1/prompt/evaluate", post(quality::handle_evaluate_prompt))
        .route("/api/v1/questions/select", post(intent::handle_select_questions))
        // Refinement sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route("/api/v1/sessions/:id", get(session::handle_get_session))
        .route(
            "/api/v1/sessions/:id/answers",
            post(session::handle_submit_answers),
        )
        .with_state(state)
}
