//! Noise filter — strips generic job-ad vocabulary and date-like tokens
//! that the dynamic discoverer inevitably picks up. Dictionary terms are
//! protected: a term the curated dictionary vouches for is only removed
//! when the denylist names it explicitly (it never does today).

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Generic job-posting vocabulary that is never a skill.
const DENYLIST: &[&str] = &[
    "ability", "apply", "applicant", "applicants", "benefits", "candidate",
    "candidates", "career", "careers", "company", "culture", "customer",
    "customers", "deadline", "degree", "department", "description", "duties",
    "email", "employee", "employees", "employer", "environment", "equal",
    "experience", "full-time", "holiday", "hybrid", "insurance", "interview",
    "job", "location", "manager", "office", "opportunity", "opportunities",
    "part-time", "pension", "people", "position", "recruiter", "recruitment",
    "remote", "responsibilities", "role", "salary", "skills", "team", "teams",
    "vacancy", "work", "working", "workplace",
];

/// Short tokens that really are technologies, exempt from the length gate.
const SHORT_TERM_ALLOWLIST: &[&str] = &[
    "api", "aws", "c", "c#", "c++", "cd", "ci", "css", "ecs", "eks", "elt",
    "etl", "gcp", "git", "go", "gpu", "ios", "jwt", "k6", "k8s", "lua", "ml",
    "php", "qa", "r", "s3", "sdk", "sql", "ssh", "svn", "tdd", "ui", "ux",
    "vpc", "xml",
];

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december", "jan", "feb", "mar",
    "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
];

static DATE_LIKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{1,4}([-/]\d{1,2}){1,2}$|^\d+\s*(d|w|m|y)$").expect("valid regex")
});

pub struct NoiseFilter {
    denylist: HashSet<&'static str>,
    allowlist: HashSet<&'static str>,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        NoiseFilter {
            denylist: DENYLIST.iter().copied().collect(),
            allowlist: SHORT_TERM_ALLOWLIST.iter().copied().collect(),
        }
    }
}

impl NoiseFilter {
    /// Judges one term. `from_dictionary` marks terms backed by the curated
    /// dictionary; those pass unless explicitly denylisted.
    pub fn is_noise(&self, term: &str, from_dictionary: bool) -> bool {
        let lower = term.to_lowercase();
        if self.denylist.contains(lower.as_str()) {
            return true;
        }
        if from_dictionary {
            return false;
        }
        if lower.len() <= 3 && !self.allowlist.contains(lower.as_str()) {
            return true;
        }
        if let Ok(year) = lower.parse::<u32>() {
            if (1900..=2100).contains(&year) {
                return true;
            }
        }
        if MONTHS.contains(&lower.as_str()) {
            return true;
        }
        DATE_LIKE_RE.is_match(&lower)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_vocabulary_is_noise() {
        let f = NoiseFilter::default();
        assert!(f.is_noise("Experience", false));
        assert!(f.is_noise("team", false));
        assert!(f.is_noise("Responsibilities", false));
    }

    #[test]
    fn test_dictionary_terms_survive() {
        let f = NoiseFilter::default();
        assert!(!f.is_noise("Python", true));
        assert!(!f.is_noise("Go", true));
    }

    #[test]
    fn test_denylist_overrides_dictionary_flag() {
        let f = NoiseFilter::default();
        assert!(f.is_noise("experience", true));
    }

    #[test]
    fn test_short_tokens_rejected_unless_allowlisted() {
        let f = NoiseFilter::default();
        assert!(f.is_noise("xyz", false));
        assert!(!f.is_noise("AWS", false));
        assert!(!f.is_noise("C#", false));
        assert!(!f.is_noise("k8s", false));
    }

    #[test]
    fn test_years_are_noise() {
        let f = NoiseFilter::default();
        assert!(f.is_noise("2024", false));
        assert!(f.is_noise("1999", false));
        assert!(!f.is_noise("8086", false));
    }

    #[test]
    fn test_month_names_are_noise() {
        let f = NoiseFilter::default();
        assert!(f.is_noise("January", false));
        assert!(f.is_noise("Sept", false));
    }

    #[test]
    fn test_date_like_tokens_are_noise() {
        let f = NoiseFilter::default();
        assert!(f.is_noise("21/01/2026", false));
        assert!(f.is_noise("2026-01-21", false));
        assert!(f.is_noise("13d", false));
    }

    #[test]
    fn test_ordinary_tech_term_passes() {
        let f = NoiseFilter::default();
        assert!(!f.is_noise("Kubernetes", false));
        assert!(!f.is_noise("GraphQL", false));
    }
}
