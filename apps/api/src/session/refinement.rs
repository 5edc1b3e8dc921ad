//! Refinement loop — drives one session through
//! `AwaitInput → Score → AskQuestions → AwaitAnswers → Score → … → Done`.
//!
//! Every turn re-scores from scratch against the accumulated answers; the
//! engine itself keeps no state between calls.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::intent::analyzer::IntentAnalyzer;
use crate::intent::questions::QuestionSelector;
use crate::models::domain::Domain;
use crate::models::session::{DoneReason, Session, SessionStatus};
use crate::quality::evaluator::PromptScorer;
use crate::session::draft::synthesize_draft;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("user_input cannot be empty")]
    EmptyInput,

    #[error("answers cannot be empty")]
    EmptyAnswers,

    #[error("session {0} is already finished")]
    Finished(Uuid),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Finished(_) => AppError::Conflict(err.to_string()),
            SessionError::EmptyInput | SessionError::EmptyAnswers => {
                AppError::Validation(err.to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopLimits {
    pub intent_cutoff: u32,
    pub prompt_cutoff: u32,
    pub max_turns: u32,
    pub max_questions_per_turn: usize,
}

impl LoopLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            intent_cutoff: config.intent_cutoff,
            prompt_cutoff: config.prompt_cutoff,
            max_turns: config.max_turns,
            // A turn that waits for answers must have asked something.
            max_questions_per_turn: config.max_questions_per_turn.max(1),
        }
    }
}

pub struct RefinementLoop {
    analyzer: Arc<IntentAnalyzer>,
    selector: Arc<QuestionSelector>,
    scorer: Arc<dyn PromptScorer>,
    limits: LoopLimits,
}

impl RefinementLoop {
    pub fn new(
        analyzer: Arc<IntentAnalyzer>,
        selector: Arc<QuestionSelector>,
        scorer: Arc<dyn PromptScorer>,
        limits: LoopLimits,
    ) -> Self {
        Self {
            analyzer,
            selector,
            scorer,
            limits,
        }
    }

    /// Opens a session and scores turn 0.
    pub fn start(&self, domain: Domain, user_input: &str) -> Result<Session, SessionError> {
        let user_input = user_input.trim();
        if user_input.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let mut session = Session::new(domain);
        session.user_input = user_input.to_string();
        session.status = SessionStatus::Score;
        self.score_and_advance(&mut session);

        info!(session_id = %session.id, %domain, "session started");
        Ok(session)
    }

    /// Appends one round of answers, advances the turn counter, and re-scores.
    /// The session is left untouched when this returns an error.
    pub fn submit_answers(
        &self,
        session: &mut Session,
        answers: Vec<String>,
    ) -> Result<(), SessionError> {
        if session.is_done() {
            return Err(SessionError::Finished(session.id));
        }

        let answers: Vec<String> = answers
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if answers.is_empty() {
            return Err(SessionError::EmptyAnswers);
        }

        session.answers.extend(answers);
        session.turn += 1;
        session.status = SessionStatus::Score;
        self.score_and_advance(session);
        Ok(())
    }

    fn score_and_advance(&self, session: &mut Session) {
        let draft = synthesize_draft(session.domain, &session.user_input, &session.answers);
        let intent = self
            .analyzer
            .analyze(&session.user_input, &session.answers, session.domain);
        let quality = self.scorer.evaluate(&draft, session.domain.as_str());

        let converged = intent.intent_score >= self.limits.intent_cutoff
            && quality.total >= self.limits.prompt_cutoff;

        session.status = if converged {
            SessionStatus::Done(DoneReason::Converged)
        } else if session.turn >= self.limits.max_turns {
            SessionStatus::Done(DoneReason::TurnLimit)
        } else {
            SessionStatus::AskQuestions
        };

        session.pending_questions = if session.status == SessionStatus::AskQuestions {
            // An empty missing list makes the selector ask from the full slot list.
            let questions = self.selector.select_for(
                &intent.missing_slots,
                Some(session.domain),
                self.limits.max_questions_per_turn,
            );
            session.status = SessionStatus::AwaitAnswers;
            questions
        } else {
            Vec::new()
        };

        info!(
            session_id = %session.id,
            turn = session.turn,
            intent_score = intent.intent_score,
            prompt_score = quality.total,
            status = ?session.status,
            "turn scored"
        );

        session.draft_prompt = draft;
        session.last_intent = Some(intent);
        session.last_quality = Some(quality);
        session.updated_at = Utc::now();
    }
}
