//! Dynamic term discoverer — finds technical terms the dictionary missed,
//! via morphological patterns: CamelCase identifiers, uppercase acronyms,
//! dot-delimited names and "<Name> <version>" pairs. Runs independently of
//! the dictionary; collisions are resolved in the engine (dictionary wins).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::dictionary::SkillCategory;
use crate::matcher::count_occurrences;

/// A candidate technical term found outside the dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredTerm {
    pub term: String,
    pub category: SkillCategory,
    pub score: f64,
    pub count: u32,
}

/// CamelCase with at least two humps (ReactNative, GitHubActions).
static CAMEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+(?:[A-Z][a-zA-Z]+)+\b").expect("valid regex"));

/// 2–6 letter uppercase runs, gated by the allow/deny lists below.
static ACRONYM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]{2,6}\b").expect("valid regex"));

/// Dot-prefixed names like ".NET" or ".NET.Core". The leading dot has no
/// word boundary, so the left edge is anchored manually.
static DOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\w.])(\.[A-Z][A-Za-z]+(?:\.[A-Z][A-Za-z]+)?)").expect("valid regex")
});

/// "<Name> <version-number>" pairs: Python 3.12, Java 8. The version is
/// dropped as metadata; only the name is kept.
static VERSIONED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][A-Za-z]+)\s+\d+(?:\.\d+)?\b").expect("valid regex"));

/// CamelCase terms already covered by the dictionary; discovering them again
/// only produces noise.
const CAMEL_DENYLIST: &[&str] = &["JavaScript", "TypeScript"];

/// Curated technical abbreviations that pass the acronym gate outright.
const ACRONYM_ALLOWLIST: &[&str] = &[
    "API", "REST", "SQL", "JSON", "XML", "HTML", "CSS", "HTTP", "HTTPS", "AWS", "GCP", "CI", "CD",
    "UI", "UX", "QA", "SDK", "IDE", "CLI", "SSH", "TLS", "SSL", "JWT", "RPC", "GRPC", "IOT", "ML",
    "AI", "NLP", "ETL", "BI", "CRM", "ERP", "SAAS", "PAAS", "IAAS", "YAML", "CSV", "DNS", "CDN",
    "VPN", "LDAP", "SAML", "OIDC", "RBAC", "ACL", "GDPR", "TDD", "BDD", "DDD", "SOLID", "SOAP",
    "SSE", "CORS", "CSRF", "XSS", "WAF", "SIEM", "PKI", "SRE", "GPU", "FPGA", "MCU", "DSP", "JVM",
    "ORM", "MVC", "MVP", "SPA", "PWA", "CMS", "SEO", "KPI",
];

/// Common English words that the 2–6 uppercase-letter pattern would
/// otherwise swallow when a posting SHOUTS AT THE READER.
const ACRONYM_DENYLIST: &[&str] = &[
    "THE", "AND", "FOR", "ARE", "BUT", "NOT", "YOU", "ALL", "CAN", "HER", "WAS", "ONE", "OUR",
    "OUT", "DAY", "GET", "HAS", "HIM", "HIS", "HOW", "ITS", "MAY", "NEW", "NOW", "OLD", "SEE",
    "TWO", "WHO", "WAY", "USE", "MAN", "MEN", "WE", "AN", "AS", "AT", "BE", "BY", "DO", "IF",
    "IN", "IS", "IT", "NO", "OF", "ON", "OR", "SO", "TO", "UP", "US", "MUST", "WITH", "WILL",
    "THIS", "THAT", "FROM", "HAVE", "WORK", "TEAM", "ROLE", "JOIN", "PLUS", "ABOUT",
];

/// Context keyword buckets used to guess a category for discovered terms.
const TESTING_CONTEXT: &[&str] = &[
    "test",
    "qa",
    "quality",
    "automation",
    "selenium",
    "playwright",
    "cypress",
    "appium",
    "jmeter",
    "postman",
];
const TESTING_TERM_HINTS: &[&str] = &[
    "test",
    "qa",
    "selenium",
    "playwright",
    "cypress",
    "appium",
    "junit",
    "pytest",
    "jest",
    "jmeter",
    "postman",
    "xunit",
];
const FRAMEWORK_TERM_HINTS: &[&str] = &[
    "react", "vue", "angular", "django", "spring", "express", "flask",
];
const DATA_TERM_HINTS: &[&str] = &[
    "sql", "database", "db", "mongo", "redis", "postgres", "mysql",
];
const CLOUD_TERMS: &[&str] = &["AWS", "Azure", "GCP"];
const DEVOPS_TERMS: &[&str] = &["Docker", "Kubernetes", "K8s", "Jenkins", "GitLab", "GitHub"];
const PLATFORM_TERMS: &[&str] = &["iOS", "Android", "Flutter"];

/// Guesses a category for a discovered term from the surrounding text.
/// Defaults to `unknown`; the dictionary overrides this on collision.
pub fn infer_category(term: &str, text: &str) -> SkillCategory {
    let text_lower = text.to_lowercase();
    let term_lower = term.to_lowercase();

    if TESTING_CONTEXT.iter().any(|k| text_lower.contains(k))
        && TESTING_TERM_HINTS.iter().any(|h| term_lower.contains(h))
    {
        return SkillCategory::Testing;
    }

    if (text_lower.contains("framework") || text_lower.contains("library"))
        && FRAMEWORK_TERM_HINTS.iter().any(|h| term_lower.contains(h))
    {
        return SkillCategory::Framework;
    }

    if CLOUD_TERMS.contains(&term) {
        return SkillCategory::Cloud;
    }

    if DEVOPS_TERMS.contains(&term) || term_lower.contains("pipeline") {
        return SkillCategory::Devops;
    }

    if DATA_TERM_HINTS.iter().any(|h| term_lower.contains(h)) {
        return SkillCategory::Data;
    }

    if PLATFORM_TERMS.contains(&term) {
        return SkillCategory::Platform;
    }

    SkillCategory::Unknown
}

/// Discovers candidate terms from all four pattern families. Returned terms
/// are unique (case-insensitively) and sorted for deterministic merging.
pub fn extract_dynamic_terms(text: &str) -> Vec<DiscoveredTerm> {
    let mut found: HashMap<String, DiscoveredTerm> = HashMap::new();

    for m in CAMEL_RE.find_iter(text) {
        let term = m.as_str();
        if term.len() <= 3 || CAMEL_DENYLIST.contains(&term) {
            continue;
        }
        let count = count_occurrences(text, term);
        found.insert(
            term.to_lowercase(),
            DiscoveredTerm {
                term: term.to_string(),
                category: infer_category(term, text),
                score: f64::from(count),
                count,
            },
        );
    }

    for m in ACRONYM_RE.find_iter(text) {
        let term = m.as_str();
        let allowed =
            ACRONYM_ALLOWLIST.contains(&term) || !ACRONYM_DENYLIST.contains(&term);
        if !allowed {
            continue;
        }
        let count = count_occurrences(text, term);
        found.insert(
            term.to_lowercase(),
            DiscoveredTerm {
                term: term.to_string(),
                category: infer_category(term, text),
                score: f64::from(count),
                count,
            },
        );
    }

    for cap in DOT_RE.captures_iter(text) {
        let term = &cap[1];
        let count = count_occurrences(text, term);
        found.insert(
            term.to_lowercase(),
            DiscoveredTerm {
                term: term.to_string(),
                // dot-delimited names are almost always frameworks
                category: SkillCategory::Framework,
                score: f64::from(count) * 1.5,
                count,
            },
        );
    }

    for cap in VERSIONED_RE.captures_iter(text) {
        let term = &cap[1];
        let count = count_occurrences(text, term);
        let category = match infer_category(term, text) {
            SkillCategory::Unknown => SkillCategory::Language,
            other => other,
        };
        found.insert(
            term.to_lowercase(),
            DiscoveredTerm {
                term: term.to_string(),
                category,
                score: f64::from(count) * 1.2,
                count,
            },
        );
    }

    let mut terms: Vec<DiscoveredTerm> = found.into_values().collect();
    terms.sort_by(|a, b| a.term.cmp(&b.term));
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term<'a>(terms: &'a [DiscoveredTerm], name: &str) -> Option<&'a DiscoveredTerm> {
        terms.iter().find(|t| t.term == name)
    }

    #[test]
    fn test_camel_case_discovered() {
        let terms = extract_dynamic_terms("We build with GitHubActions and PostgreSQL.");
        assert!(term(&terms, "GitHubActions").is_some());
    }

    #[test]
    fn test_camel_denylist_excluded() {
        let terms = extract_dynamic_terms("JavaScript and TypeScript experience.");
        assert!(term(&terms, "JavaScript").is_none());
        assert!(term(&terms, "TypeScript").is_none());
    }

    #[test]
    fn test_allowlisted_acronym_kept() {
        let terms = extract_dynamic_terms("Design a REST API over HTTP.");
        assert!(term(&terms, "API").is_some());
        assert!(term(&terms, "REST").is_some());
    }

    #[test]
    fn test_common_english_uppercase_dropped() {
        let terms = extract_dynamic_terms("JOIN THE TEAM AND APPLY NOW");
        assert!(term(&terms, "THE").is_none());
        assert!(term(&terms, "AND").is_none());
        assert!(term(&terms, "TEAM").is_none());
    }

    #[test]
    fn test_unlisted_plausible_acronym_kept() {
        // not on the allow-list, but 2–6 caps and not common English
        let terms = extract_dynamic_terms("Experience with SNMP monitoring.");
        assert!(term(&terms, "SNMP").is_some());
    }

    #[test]
    fn test_dot_notation_scored_higher() {
        let terms = extract_dynamic_terms("Deep .NET experience required.");
        let t = term(&terms, ".NET").unwrap();
        assert_eq!(t.category, SkillCategory::Framework);
        assert!((t.score - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_versioned_term_keeps_name_drops_version() {
        let terms = extract_dynamic_terms("Experience with Python 3.12 expected.");
        let t = term(&terms, "Python").unwrap();
        assert_eq!(t.count, 1);
        assert!(term(&terms, "3.12").is_none());
    }

    #[test]
    fn test_versioned_term_defaults_to_language() {
        let terms = extract_dynamic_terms("Knows Erlang 26 well.");
        assert_eq!(term(&terms, "Erlang").unwrap().category, SkillCategory::Language);
    }

    #[test]
    fn test_infer_category_cloud() {
        assert_eq!(infer_category("AWS", "anything"), SkillCategory::Cloud);
        assert_eq!(infer_category("GCP", "anything"), SkillCategory::Cloud);
    }

    #[test]
    fn test_infer_category_devops_pipeline() {
        assert_eq!(
            infer_category("DataPipeline", "deploy stuff"),
            SkillCategory::Devops
        );
        assert_eq!(infer_category("Docker", "x"), SkillCategory::Devops);
    }

    #[test]
    fn test_infer_category_testing_needs_context_and_hint() {
        let text = "Automation testing role using modern tooling";
        assert_eq!(infer_category("TestCafe", text), SkillCategory::Testing);
        // no testing context in surrounding text → not testing
        assert_ne!(infer_category("TestCafe", "plain text"), SkillCategory::Testing);
    }

    #[test]
    fn test_infer_category_data() {
        assert_eq!(infer_category("CloudSQL", "x"), SkillCategory::Data);
    }

    #[test]
    fn test_counts_are_case_insensitive() {
        let terms = extract_dynamic_terms("GraphQL is great. We love graphql. GraphQL!");
        assert_eq!(term(&terms, "GraphQL").unwrap().count, 3);
    }

    #[test]
    fn test_output_sorted_by_term() {
        let terms = extract_dynamic_terms("ZshConfig then ApiGateway here.");
        let names: Vec<&str> = terms.iter().map(|t| t.term.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }
}
