//! JD requirements-profile extraction engine.
//!
//! Turns unstructured job-posting text into a structured requirements
//! profile: ranked technical keywords, a disjoint must-have/nice-to-have
//! split, years of experience, required degree, certifications, a role
//! family and seniority tag, and a best-effort posting date. The rule-based
//! pipeline is pure and deterministic; an optional LLM assistant can merge
//! in an externally produced candidate profile.

pub mod classify;
pub mod config;
pub mod context;
pub mod dates;
pub mod dictionary;
pub mod discovery;
pub mod engine;
pub mod errors;
pub mod fields;
pub mod filter;
pub mod llm_client;
pub mod matcher;
pub mod profile;
pub mod role;
pub mod scoring;

pub use config::Config;
pub use dictionary::{SkillCategory, SkillDictionary};
pub use engine::Engine;
pub use errors::EngineError;
pub use llm_client::{AiCandidate, AnthropicSource, CandidateSource, LlmClient};
pub use profile::{ExtractionMethod, RequirementsProfile, ScoredKeyword, Seniority};
