//! Structured field extractors: years of experience, required degree and
//! certifications. Each is a stateless parser over the full text; a miss is
//! an absent value, never an error.

use std::sync::LazyLock;

use regex::Regex;

use crate::matcher::find_occurrences;

/// Ordered numeric-experience patterns. The maximum N across every match
/// wins (postings often state both a headline figure and a lower minimum).
static EXPERIENCE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(\d+)\+?\s*years?\s+of?\s+experience",
        r"(?i)(\d+)\+?\s*yrs?\s+of?\s+experience",
        r"(?i)experience.*?(\d+)\+?\s*years?",
        r"(?i)(\d+)\+?\s*years?\s+experience",
        r"(?i)minimum\s+of\s+(\d+)\s*years?",
        r"(?i)at\s+least\s+(\d+)\s*years?",
        r"(?i)(\d+)\+?\s*years?\s+in",
        r"(?i)(\d+)\+?\s*years?\s+working",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid regex"))
    .collect()
});

/// Extracts the required years of experience, taking the maximum across all
/// pattern matches.
pub fn extract_years_required(text: &str) -> Option<u32> {
    let mut best: Option<u32> = None;
    for pattern in EXPERIENCE_PATTERNS.iter() {
        for cap in pattern.captures_iter(text) {
            if let Ok(years) = cap[1].parse::<u32>() {
                best = Some(best.map_or(years, |b| b.max(years)));
            }
        }
    }
    best
}

/// Degree levels in strict priority order: PhD beats Master beats Bachelor
/// beats Associate regardless of mention order in the text.
const DEGREE_LEVELS: &[(&str, &[&str])] = &[
    ("PhD", &["phd", "ph.d", "doctorate", "doctoral"]),
    ("Master", &["master", "master's", "m.sc", "mba"]),
    ("Bachelor", &["bachelor", "bachelor's", "b.sc"]),
    ("Associate", &["associate"]),
];

/// Extracts the required degree. When a field of study follows the degree
/// keyword ("Bachelor of Science in Computer Science"), it is appended;
/// otherwise just the level is returned.
pub fn extract_degree_required(text: &str) -> Option<String> {
    for (level, keywords) in DEGREE_LEVELS {
        for keyword in *keywords {
            if find_occurrences(text, keyword).is_empty() {
                continue;
            }
            if let Some(field) = degree_field(text, keyword) {
                return Some(format!("{level} in {field}"));
            }
            return Some((*level).to_string());
        }
    }
    None
}

/// Captures a study field trailing a degree keyword on the same line.
/// The field itself must be capitalized ("in Computer Science"), which keeps
/// prose like "in a fast-paced environment" out. "in" is preferred over
/// "of" so that "Bachelor of Science in X" yields X, not "Science in X".
fn degree_field(text: &str, keyword: &str) -> Option<String> {
    let kw = regex::escape(keyword);
    for sep in ["in", "of"] {
        let pattern = format!(
            r"(?i:\b{kw}(?:'s)?(?:\s+degree)?)[^\n]*\b{sep}\s+([A-Z][A-Za-z]*(?:\s+[A-Z][A-Za-z]*)*)"
        );
        let re = Regex::new(&pattern).ok()?;
        if let Some(cap) = re.captures(text) {
            let field = cap[1].trim().to_string();
            if field.len() > 2 {
                return Some(field);
            }
        }
    }
    None
}

/// Fixed certification-name list; matching is case-insensitive and
/// boundary-aware.
const CERTIFICATIONS: &[&str] = &[
    "AWS Certified",
    "AWS Solutions Architect",
    "AWS Developer",
    "Azure Certified",
    "Azure Solutions Architect",
    "GCP Certified",
    "Google Cloud Professional",
    "PMP",
    "Project Management Professional",
    "Scrum Master",
    "Certified Scrum Master",
    "CSM",
    "CISSP",
    "Cisco Certified",
    "CCNA",
    "CCNP",
    "Oracle Certified",
    "Microsoft Certified",
    "MCSE",
    "Kubernetes Certified",
    "CKA",
    "CKAD",
    "ISTQB",
    "Salesforce Certified",
    "Salesforce Administrator",
    "Red Hat Certified",
    "RHCE",
];

/// Extracts the de-duplicated, sorted set of certification names mentioned.
pub fn extract_certifications(text: &str) -> Vec<String> {
    let mut found: Vec<String> = CERTIFICATIONS
        .iter()
        .filter(|cert| !find_occurrences(text, cert).is_empty())
        .map(|cert| (*cert).to_string())
        .collect();
    found.sort();
    found.dedup();
    found
}
