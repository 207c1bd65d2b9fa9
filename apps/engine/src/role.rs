//! Role-family and seniority inference. Pure functions of (title, JD text):
//! the title is trusted first, the body only when the title gives no signal,
//! so skill mentions in the body never masquerade as the job's function.

use crate::fields::extract_years_required;
use crate::matcher::find_occurrences;
use crate::profile::Seniority;

const TESTING_TITLES: &[&str] = &[
    "test engineer", "qa engineer", "quality assurance engineer", "software tester",
    "test automation engineer", "qa analyst", "test specialist", "qa specialist",
    "testing engineer", "test lead", "qa lead", "test manager", "quality engineer",
    "test developer", "qa developer", "automation tester", "manual tester",
    "performance tester", "security tester",
];

const AI_TITLES: &[&str] = &[
    "ai engineer", "ai developer", "artificial intelligence engineer",
    "machine learning engineer", "ml engineer", "ai researcher", "ai specialist",
    "ml specialist", "ai architect", "ml architect",
];

const BACKEND_TITLES: &[&str] = &[
    "backend engineer", "backend developer", "back-end engineer", "back-end developer",
    "server-side developer", "api developer", "server developer", "python developer",
    "java developer", "go developer", "rust developer", "node.js developer",
    "php developer", ".net developer", "c# developer", "ruby developer",
    "scala developer",
];

const FRONTEND_TITLES: &[&str] = &[
    "frontend engineer", "frontend developer", "front-end engineer",
    "front-end developer", "ui developer", "ux developer", "ui engineer",
    "react developer", "vue developer", "angular developer",
    "javascript developer", "typescript developer", "web developer",
];

const FULLSTACK_TITLES: &[&str] = &[
    "full stack", "fullstack", "full-stack",
];

const DEVOPS_TITLES: &[&str] = &[
    "devops engineer", "dev ops engineer", "sre", "site reliability engineer",
    "infrastructure engineer", "cloud engineer", "platform engineer",
];

const DATA_TITLES: &[&str] = &[
    "data engineer", "data scientist", "data analyst", "data architect",
];

const MOBILE_TITLES: &[&str] = &[
    "mobile developer", "ios developer", "android developer",
    "react native developer", "flutter developer", "mobile engineer",
];

const GENERAL_DEV_TITLES: &[&str] = &[
    "software engineer", "software developer", "developer", "programmer",
    "engineer", "software", "development",
];

/// Title-keyword groups in strict priority order. Backend and frontend fold
/// into "fullstack": the job market treats them as one hiring pool and the
/// downstream consumers only care about the coarse family.
const FAMILY_GROUPS: &[(&[&str], &str)] = &[
    (TESTING_TITLES, "testing"),
    (AI_TITLES, "ai"),
    (FULLSTACK_TITLES, "fullstack"),
    (BACKEND_TITLES, "fullstack"),
    (FRONTEND_TITLES, "fullstack"),
    (DEVOPS_TITLES, "devops"),
    (DATA_TITLES, "data"),
    (MOBILE_TITLES, "mobile"),
];

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// Infers the coarse role family.
///
/// Cascade: explicit title group first; a generic developer title ("software
/// engineer", "developer", …) resolves to "fullstack"; a title with no
/// recognizable keyword at all falls back to the same group scan over the
/// JD body.
pub fn infer_role_family(title: &str, jd_text: &str) -> Option<&'static str> {
    let title_lower = title.to_lowercase();

    for (group, family) in FAMILY_GROUPS {
        if contains_any(&title_lower, group) {
            return Some(family);
        }
    }

    if contains_any(&title_lower, GENERAL_DEV_TITLES) {
        return Some("fullstack");
    }

    let jd_lower = jd_text.to_lowercase();
    for (group, family) in FAMILY_GROUPS {
        if contains_any(&jd_lower, group) {
            return Some(family);
        }
    }

    None
}

/// A seniority rule: first predicate match over the lowercased title wins.
struct SeniorityRule {
    name: &'static str,
    applies: fn(&str) -> bool,
    outcome: Seniority,
}

fn has_word(title: &str, word: &str) -> bool {
    !find_occurrences(title, word).is_empty()
}

fn is_assistant_role(title: &str) -> bool {
    ["assistant", "coordinator", "intern", "trainee"]
        .iter()
        .any(|w| title.contains(w))
}

/// Ordered seniority cascade. "Architect" beats everything; "manager" keeps
/// its mapping even for "assistant manager" (the person still manages);
/// "principal"-tier words are suppressed for assistant/coordinator titles.
const SENIORITY_RULES: &[SeniorityRule] = &[
    SeniorityRule {
        name: "architect",
        applies: |t| t.contains("architect"),
        outcome: Seniority::Architect,
    },
    SeniorityRule {
        name: "manager",
        applies: |t| t.contains("manager"),
        outcome: Seniority::Manager,
    },
    SeniorityRule {
        name: "lead",
        applies: |t| has_word(t, "lead") || t.contains("head of") || t.contains("director"),
        outcome: Seniority::Lead,
    },
    SeniorityRule {
        name: "principal",
        applies: |t| {
            (t.contains("principal") || t.contains("distinguished") || has_word(t, "fellow"))
                && !is_assistant_role(t)
        },
        outcome: Seniority::Principal,
    },
    SeniorityRule {
        name: "graduate",
        applies: |t| has_word(t, "graduate") || has_word(t, "grad"),
        outcome: Seniority::Graduate,
    },
    SeniorityRule {
        name: "senior",
        applies: |t| t.contains("senior") || has_word(t, "sr"),
        outcome: Seniority::Senior,
    },
    SeniorityRule {
        name: "mid",
        applies: |t| has_word(t, "mid") || t.contains("middle") || t.contains("intermediate"),
        outcome: Seniority::Mid,
    },
    SeniorityRule {
        name: "junior",
        applies: |t| {
            t.contains("junior") || has_word(t, "entry") || t.contains("intern")
                || has_word(t, "jr")
        },
        outcome: Seniority::Junior,
    },
];

/// Infers seniority from the title cascade, falling back to years-required
/// thresholds from the JD body: ≥5 senior, 3–4 mid, <2 junior. Exactly two
/// years is ambiguous and yields no inference.
pub fn infer_seniority(title: &str, jd_text: &str) -> Option<Seniority> {
    let title_lower = title.to_lowercase();

    if let Some(rule) = SENIORITY_RULES.iter().find(|r| (r.applies)(&title_lower)) {
        return Some(rule.outcome);
    }

    match extract_years_required(jd_text) {
        Some(years) if years >= 5 => Some(Seniority::Senior),
        Some(years) if (3..=4).contains(&years) => Some(Seniority::Mid),
        Some(years) if years < 2 => Some(Seniority::Junior),
        _ => None,
    }
}
