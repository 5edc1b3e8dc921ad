use anyhow::{bail, Context, Result};

use crate::intent::analyzer::DEFAULT_COMPLETE_AT;
use crate::quality::evaluator::DEFAULT_MAX_PROMPT_LENGTH;

/// Application configuration loaded from environment variables.
/// Every variable has a default; a present but malformed value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Intent score needed to converge, and to call intent complete with slots missing.
    pub intent_cutoff: u32,
    pub prompt_cutoff: u32,
    pub max_turns: u32,
    pub max_questions_per_turn: usize,
    /// Character cap for the `format` quality criterion.
    pub max_prompt_length: usize,
    /// Sessions untouched for longer than this are evicted from memory.
    pub session_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            intent_cutoff: DEFAULT_COMPLETE_AT,
            prompt_cutoff: 95,
            max_turns: 10,
            max_questions_per_turn: 2,
            max_prompt_length: DEFAULT_MAX_PROMPT_LENGTH,
            session_ttl_secs: 3600,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so parsing is testable without process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let config = Config {
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            intent_cutoff: parse_or(&lookup, "INTENT_CUTOFF", defaults.intent_cutoff)?,
            prompt_cutoff: parse_or(&lookup, "PROMPT_CUTOFF", defaults.prompt_cutoff)?,
            max_turns: parse_or(&lookup, "MAX_TURNS", defaults.max_turns)?,
            max_questions_per_turn: parse_or(
                &lookup,
                "MAX_QUESTIONS_PER_TURN",
                defaults.max_questions_per_turn,
            )?,
            max_prompt_length: parse_or(&lookup, "MAX_PROMPT_LENGTH", defaults.max_prompt_length)?,
            session_ttl_secs: parse_or(&lookup, "SESSION_TTL_SECS", defaults.session_ttl_secs)?,
        };

        if config.intent_cutoff > 100 || config.prompt_cutoff > 100 {
            bail!("INTENT_CUTOFF and PROMPT_CUTOFF must be between 0 and 100");
        }
        if config.max_turns == 0 || config.max_questions_per_turn == 0 {
            bail!("MAX_TURNS and MAX_QUESTIONS_PER_TURN must be at least 1");
        }
        if config.session_ttl_secs == 0 {
            bail!("SESSION_TTL_SECS must be at least 1");
        }

        Ok(config)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
