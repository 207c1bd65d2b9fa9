//! LLM client — the single point of entry for the optional extraction
//! assistant. No other module may call the Anthropic API directly.
//!
//! The assistant is best-effort: every response field is normalized
//! leniently in [`AiCandidate::from_value`], and any transport or parse
//! failure is recovered by the orchestrator falling back to the pure
//! rule-based result.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::profile::Seniority;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Intentionally hardcoded to prevent accidental drift between environments.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const MAX_RETRIES: u32 = 3;

/// Role families the assistant is allowed to assert. Anything else
/// (including "other"/"unknown" sentinels) is treated as no answer.
const VALID_ROLE_FAMILIES: &[&str] = &[
    "testing", "ai", "fullstack", "backend", "frontend", "devops", "data", "mobile",
];

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl LlmResponse {
    /// Extracts the text content from the first text block.
    pub fn text(&self) -> Option<&str> {
        self.content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// Externally produced candidate profile, already normalized: every field
/// optional or empty when the assistant omitted or mangled it. Seniority
/// and role-family sentinels collapse to `None` at this boundary so the
/// merge policy only ever sees real answers.
#[derive(Debug, Clone, Default)]
pub struct AiCandidate {
    pub keywords: Vec<String>,
    pub must_have: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub years_required: Option<u32>,
    pub degree_required: Option<String>,
    pub certifications: Vec<String>,
    pub role_family: Option<String>,
    pub seniority: Option<Seniority>,
    pub posted_date: Option<NaiveDate>,
    pub summary: Option<String>,
}

impl AiCandidate {
    /// Builds a candidate from a raw JSON value, defaulting every missing
    /// or malformed field. Keyword entries may be plain strings or records
    /// carrying a `term` key; both are accepted.
    pub fn from_value(value: &Value) -> AiCandidate {
        let mut candidate = AiCandidate {
            keywords: string_list(value, "keywords"),
            must_have: string_list(value, "must_have_keywords"),
            nice_to_have: string_list(value, "nice_to_have_keywords"),
            ..AiCandidate::default()
        };

        candidate.years_required = match value.get("years_required") {
            Some(Value::Number(n)) => n.as_u64().map(|y| y as u32),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };

        candidate.degree_required = non_empty_string(value, "degree_required");
        candidate.certifications = string_list(value, "certifications");

        candidate.role_family = non_empty_string(value, "role_family")
            .map(|s| s.to_lowercase())
            .filter(|s| VALID_ROLE_FAMILIES.contains(&s.as_str()));

        candidate.seniority =
            non_empty_string(value, "seniority").and_then(|s| Seniority::parse(&s));

        candidate.posted_date = non_empty_string(value, "posted_date")
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());

        candidate.summary = non_empty_string(value, "summary");

        candidate
    }
}

/// Reads `value[key]` as a list of terms; entries may be strings or
/// objects with a `term` field. Anything else is skipped.
fn string_list(value: &Value, key: &str) -> Vec<String> {
    let Some(Value::Array(items)) = value.get(key) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Object(map) => map
                .get("term")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().to_string()),
            _ => None,
        })
        .collect()
}

fn non_empty_string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Anything that can propose a candidate profile for a JD text. The
/// production implementation is [`AnthropicSource`]; tests substitute
/// canned candidates.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn propose(
        &self,
        jd_text: &str,
        title: Option<&str>,
        company: Option<&str>,
    ) -> Result<AiCandidate, LlmError>;
}

/// Wraps the Anthropic Messages API with retry logic and structured output
/// helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()?;
        Ok(Self { client, api_key })
    }

    /// Makes a raw call to the API, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<LlmResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(ANTHROPIC_API_URL)
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", ANTHROPIC_VERSION)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<AnthropicError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let llm_response: LlmResponse = response.json().await?;

            debug!(
                "LLM call succeeded: input_tokens={}, output_tokens={}",
                llm_response.usage.input_tokens, llm_response.usage.output_tokens
            );

            return Ok(llm_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Calls the LLM and parses the text response as a JSON value. The
    /// prompt must instruct the model to return valid JSON.
    pub async fn call_json(&self, prompt: &str, system: &str) -> Result<Value, LlmError> {
        let response = self.call(prompt, system).await?;

        let text = response.text().ok_or(LlmError::EmptyContent)?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(text);

        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Production candidate source backed by [`LlmClient`].
#[derive(Clone)]
pub struct AnthropicSource {
    client: LlmClient,
}

impl AnthropicSource {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CandidateSource for AnthropicSource {
    async fn propose(
        &self,
        jd_text: &str,
        title: Option<&str>,
        company: Option<&str>,
    ) -> Result<AiCandidate, LlmError> {
        let prompt = prompts::build_extraction_prompt(jd_text, title, company);
        let value = self
            .client
            .call_json(&prompt, prompts::JSON_ONLY_SYSTEM)
            .await?;
        Ok(AiCandidate::from_value(&value))
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_candidate_from_well_formed_value() {
        let value = json!({
            "keywords": ["Python", "Django"],
            "must_have_keywords": ["Python"],
            "nice_to_have_keywords": ["Kubernetes"],
            "years_required": 5,
            "degree_required": "Bachelor",
            "certifications": ["AWS Certified"],
            "role_family": "fullstack",
            "seniority": "senior",
            "posted_date": "2024-01-07",
            "summary": "Backend-heavy product role."
        });
        let c = AiCandidate::from_value(&value);
        assert_eq!(c.keywords, vec!["Python", "Django"]);
        assert_eq!(c.years_required, Some(5));
        assert_eq!(c.role_family.as_deref(), Some("fullstack"));
        assert_eq!(c.seniority, Some(Seniority::Senior));
        assert_eq!(
            c.posted_date,
            NaiveDate::from_ymd_opt(2024, 1, 7)
        );
        assert!(c.summary.is_some());
    }

    #[test]
    fn test_candidate_accepts_keyword_records() {
        let value = json!({
            "keywords": [{"term": "Python", "score": 9.1}, {"term": "Kafka"}, "Go"]
        });
        let c = AiCandidate::from_value(&value);
        assert_eq!(c.keywords, vec!["Python", "Kafka", "Go"]);
    }

    #[test]
    fn test_candidate_defaults_on_malformed_fields() {
        let value = json!({
            "keywords": "not-an-array",
            "years_required": "lots",
            "role_family": 42,
            "seniority": ["senior"]
        });
        let c = AiCandidate::from_value(&value);
        assert!(c.keywords.is_empty());
        assert_eq!(c.years_required, None);
        assert_eq!(c.role_family, None);
        assert_eq!(c.seniority, None);
    }

    #[test]
    fn test_candidate_collapses_sentinels() {
        let value = json!({
            "role_family": "other",
            "seniority": "unknown"
        });
        let c = AiCandidate::from_value(&value);
        assert_eq!(c.role_family, None);
        assert_eq!(c.seniority, None);
    }

    #[test]
    fn test_candidate_rejects_invalid_role_family() {
        let value = json!({"role_family": "underwater basket weaving"});
        assert_eq!(AiCandidate::from_value(&value).role_family, None);
    }

    #[test]
    fn test_candidate_parses_numeric_string_years() {
        let value = json!({"years_required": "7"});
        assert_eq!(AiCandidate::from_value(&value).years_required, Some(7));
    }

    #[test]
    fn test_candidate_from_empty_object() {
        let c = AiCandidate::from_value(&json!({}));
        assert!(c.keywords.is_empty());
        assert!(c.must_have.is_empty());
        assert_eq!(c.seniority, None);
        assert_eq!(c.posted_date, None);
    }

    #[test]
    fn test_staff_seniority_accepted_from_candidate() {
        let value = json!({"seniority": "staff"});
        assert_eq!(
            AiCandidate::from_value(&value).seniority,
            Some(Seniority::Staff)
        );
    }
}
