use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jd_engine::llm_client::{AnthropicSource, LlmClient};
use jd_engine::{Config, Engine, SkillDictionary};

/// CLI harness: reads a JD text file, runs extraction, prints the profile
/// as JSON. Usage: `jd-engine <jd-file> [title] [company]`.
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jd-engine v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let jd_path = args.next().context("usage: jd-engine <jd-file> [title] [company]")?;
    let title = args.next();
    let company = args.next();

    let jd_text = std::fs::read_to_string(&jd_path)
        .with_context(|| format!("failed to read JD file {jd_path}"))?;

    let dict = match &config.skill_dictionary_path {
        Some(path) => SkillDictionary::load(path)?,
        None => SkillDictionary::embedded(),
    };
    info!("Skill dictionary loaded ({} canonical terms)", dict.len());

    let engine = Engine::new(dict);
    let now = Utc::now();

    let profile = match &config.anthropic_api_key {
        Some(key) => {
            let client = LlmClient::new(key.clone())?;
            let source = AnthropicSource::new(client);
            engine
                .extract_hybrid(
                    &jd_text,
                    title.as_deref(),
                    company.as_deref(),
                    &source,
                    Duration::from_secs(config.llm_timeout_secs),
                    now,
                )
                .await
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set, running rule-based extraction only");
            engine.extract(&jd_text, title.as_deref(), now)
        }
    };

    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}
