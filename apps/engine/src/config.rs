use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// The engine itself runs without any of these; the LLM assistant path is
/// only enabled when an API key is present.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the LLM assistant. `None` disables the hybrid path.
    pub anthropic_api_key: Option<String>,
    /// Path to a skill dictionary JSON document. Falls back to the embedded one.
    pub skill_dictionary_path: Option<String>,
    /// Upper bound on a single LLM assistant call, in seconds.
    pub llm_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            skill_dictionary_path: std::env::var("SKILL_DICTIONARY_PATH").ok(),
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be a positive integer")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
