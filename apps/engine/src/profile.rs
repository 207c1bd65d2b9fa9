//! Output data model: the structured requirements profile produced per
//! extraction call. Created fresh each call, never mutated after return.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dictionary::SkillCategory;

/// A ranked technical keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredKeyword {
    pub term: String,
    pub category: SkillCategory,
    /// Relevance score, ≥ 0. See the scoring engine for the formula.
    pub score: f64,
    /// Occurrence count in the source text.
    pub count: u32,
}

/// Coarse experience-level tag. "Unknown" is not a variant: an absent or
/// unrecognized level is `None` wherever seniority appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    Graduate,
    Junior,
    Mid,
    Senior,
    Staff,
    Lead,
    Manager,
    Architect,
    Principal,
}

impl Seniority {
    /// Parses an external label. "intermediate" is accepted as MID; anything
    /// unrecognized (including the "unknown" sentinel) yields `None`.
    pub fn parse(label: &str) -> Option<Seniority> {
        match label.trim().to_lowercase().as_str() {
            "graduate" => Some(Seniority::Graduate),
            "junior" => Some(Seniority::Junior),
            "mid" | "intermediate" => Some(Seniority::Mid),
            "senior" => Some(Seniority::Senior),
            "staff" => Some(Seniority::Staff),
            "lead" => Some(Seniority::Lead),
            "manager" => Some(Seniority::Manager),
            "architect" => Some(Seniority::Architect),
            "principal" => Some(Seniority::Principal),
            _ => None,
        }
    }
}

/// Which path produced the final role/seniority pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionMethod {
    RuleBased,
    AiEnhanced,
}

/// Structured requirements profile for one job-posting text.
///
/// `must_have`, `nice_to_have` and `certifications` are kept as sorted,
/// de-duplicated vectors so that re-running extraction on identical input
/// yields a byte-identical serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequirementsProfile {
    /// Ordered by score descending; ties broken by term ascending.
    pub keywords: Vec<ScoredKeyword>,
    pub must_have: Vec<String>,
    pub nice_to_have: Vec<String>,
    pub years_required: Option<u32>,
    pub degree_required: Option<String>,
    pub certifications: Vec<String>,
    pub role_family: Option<String>,
    pub seniority: Option<Seniority>,
    pub posted_date: Option<NaiveDate>,
    /// Short free-text summary; only the external assistant supplies this.
    pub summary: Option<String>,
    pub extraction_method: ExtractionMethod,
}

impl RequirementsProfile {
    pub fn empty() -> Self {
        RequirementsProfile {
            keywords: Vec::new(),
            must_have: Vec::new(),
            nice_to_have: Vec::new(),
            years_required: None,
            degree_required: None,
            certifications: Vec::new(),
            role_family: None,
            seniority: None,
            posted_date: None,
            summary: None,
            extraction_method: ExtractionMethod::RuleBased,
        }
    }
}

/// Sorts keywords by score descending, then term ascending. The secondary
/// key makes equal-score orderings deterministic across runs.
pub fn sort_keywords(keywords: &mut [ScoredKeyword]) {
    keywords.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.term.cmp(&b.term))
    });
}
