//! Scoring engine — converts occurrence counts and context signals into a
//! relevance score per canonical term.
//!
//! `score = count × category_weight + Σ bonuses`. Bonuses are flat and
//! accumulate per occurrence, except the title bonus which is granted once.

use crate::context::ContextSignals;
use crate::dictionary::SkillCategory;

pub const TITLE_BONUS: f64 = 3.0;
pub const HEADING_BONUS: f64 = 2.0;
pub const MUST_HAVE_BONUS: f64 = 3.0;
pub const NICE_BONUS_SECTION: f64 = 2.0;
pub const NICE_PHRASE_BONUS: f64 = 1.5;
pub const TECH_STACK_BONUS: f64 = 5.0;

/// Fixed per-category weight table, ATS-style: testing tools and languages
/// rank above generic tooling, unknown provenance ranks lowest.
pub fn category_weight(category: SkillCategory) -> f64 {
    match category {
        SkillCategory::Testing => 1.5,
        SkillCategory::Language => 1.3,
        SkillCategory::Framework => 1.2,
        SkillCategory::Devops | SkillCategory::Cloud => 1.1,
        SkillCategory::Platform
        | SkillCategory::Database
        | SkillCategory::Data
        | SkillCategory::Architecture => 1.0,
        SkillCategory::Tool => 0.9,
        SkillCategory::Process => 0.8,
        SkillCategory::Unknown => 0.7,
    }
}

/// Scores one term from its per-occurrence context signals.
///
/// `title_hit` is computed by the caller over the raw title region (the
/// alias or canonical spelling appearing in the first 200 chars counts even
/// without a boundary-aware occurrence there).
pub fn score_term(
    category: SkillCategory,
    occurrence_signals: &[ContextSignals],
    title_hit: bool,
) -> f64 {
    let count = occurrence_signals.len() as f64;
    let mut score = count * category_weight(category);

    if title_hit {
        score += TITLE_BONUS;
    }

    for signals in occurrence_signals {
        if signals.in_heading {
            score += HEADING_BONUS;
        }
        if signals.in_must_section {
            score += MUST_HAVE_BONUS;
        }
        if signals.in_bonus_section {
            score += NICE_BONUS_SECTION;
        } else if signals.has_nice_phrase {
            score += NICE_PHRASE_BONUS;
        }
        if signals.in_tech_stack {
            score += TECH_STACK_BONUS;
        }
    }

    score
}
