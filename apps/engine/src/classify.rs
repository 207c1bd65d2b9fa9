//! Must-have / nice-to-have classification. Context signals from every
//! occurrence of a term are folded into one set of votes, then an ordered
//! rule cascade assigns the term to at most one bucket. Bonus-section
//! membership always wins, so a term can never land in both sets.

use std::collections::BTreeSet;

use tracing::warn;

use crate::context::ContextSignals;

/// Aggregated votes for one term across all of its occurrences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TermVotes {
    pub has_bonus_experience: bool,
    pub has_skills_section: bool,
    pub has_tech_stack: bool,
    pub has_nice_indicator: bool,
    pub has_must_indicator: bool,
}

impl TermVotes {
    /// ORs one occurrence's signals into the running votes.
    pub fn absorb(&mut self, signals: &ContextSignals) {
        self.has_bonus_experience |= signals.in_bonus_section;
        self.has_skills_section |= signals.in_skills_section;
        self.has_tech_stack |= signals.in_tech_stack;
        self.has_nice_indicator |= signals.has_nice_phrase;
        self.has_must_indicator |= signals.in_must_section;
    }

    /// ORs another term's accumulated votes into these (used when two
    /// spellings of the same term are folded together).
    pub fn absorb_all(&mut self, other: &TermVotes) {
        self.has_bonus_experience |= other.has_bonus_experience;
        self.has_skills_section |= other.has_skills_section;
        self.has_tech_stack |= other.has_tech_stack;
        self.has_nice_indicator |= other.has_nice_indicator;
        self.has_must_indicator |= other.has_must_indicator;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    MustHave,
    NiceToHave,
}

struct ClassificationRule {
    name: &'static str,
    applies: fn(&TermVotes) -> bool,
    outcome: Bucket,
}

/// Ordered cascade; the first matching rule wins. A bonus-section vote
/// outranks everything, including a simultaneous skills-section vote for
/// another occurrence of the same term.
const RULES: &[ClassificationRule] = &[
    ClassificationRule {
        name: "bonus-section",
        applies: |v| v.has_bonus_experience,
        outcome: Bucket::NiceToHave,
    },
    ClassificationRule {
        name: "skills-or-stack",
        applies: |v| v.has_skills_section || v.has_tech_stack,
        outcome: Bucket::MustHave,
    },
    ClassificationRule {
        name: "nice-phrase",
        applies: |v| v.has_nice_indicator && !v.has_must_indicator,
        outcome: Bucket::NiceToHave,
    },
    ClassificationRule {
        name: "must-indicator",
        applies: |v| v.has_must_indicator,
        outcome: Bucket::MustHave,
    },
];

/// Classifies one term's votes; `None` when no rule fires (the term stays
/// in neither set).
pub fn classify(votes: &TermVotes) -> Option<Bucket> {
    RULES
        .iter()
        .find(|rule| (rule.applies)(votes))
        .map(|rule| rule.outcome)
}

/// The two requirement sets, kept sorted for stable output.
#[derive(Debug, Default)]
pub struct ClassificationSets {
    pub must_have: BTreeSet<String>,
    pub nice_to_have: BTreeSet<String>,
}

impl ClassificationSets {
    pub fn insert(&mut self, term: String, bucket: Bucket) {
        match bucket {
            Bucket::MustHave => self.must_have.insert(term),
            Bucket::NiceToHave => self.nice_to_have.insert(term),
        };
    }

    /// Safety net: the cascade guarantees disjoint sets, so an intersection
    /// here means a classification bug upstream. An overlapping term stays
    /// in nice-to-have when `occurs_in_bonus` reports it was seen in a
    /// bonus-experience region, otherwise it stays in must-have; either way
    /// a warning is logged. Returns the number of terms moved.
    pub fn resolve_overlaps<F>(&mut self, occurs_in_bonus: F) -> usize
    where
        F: Fn(&str) -> bool,
    {
        let overlap: Vec<String> = self
            .must_have
            .intersection(&self.nice_to_have)
            .cloned()
            .collect();
        for term in &overlap {
            if occurs_in_bonus(term) {
                warn!(term = %term, "term classified into both requirement sets, keeping nice-to-have");
                self.must_have.remove(term);
            } else {
                warn!(term = %term, "term classified into both requirement sets, keeping must-have");
                self.nice_to_have.remove(term);
            }
        }
        overlap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextIndex;
    use crate::matcher::find_occurrences;

    fn votes_for(text: &str, term: &str) -> TermVotes {
        let index = ContextIndex::new(text);
        let mut votes = TermVotes::default();
        for occ in find_occurrences(text, term) {
            votes.absorb(&index.classify(&occ));
        }
        votes
    }

    #[test]
    fn test_bonus_section_yields_nice_to_have() {
        let votes = votes_for("Bonus experience: Kubernetes.", "kubernetes");
        assert_eq!(classify(&votes), Some(Bucket::NiceToHave));
    }

    #[test]
    fn test_skills_section_yields_must_have() {
        let votes = votes_for("Requirements: Python, Django.", "django");
        assert_eq!(classify(&votes), Some(Bucket::MustHave));
    }

    #[test]
    fn test_tech_stack_yields_must_have() {
        let votes = votes_for("Tech stack: Kafka, Postgres.", "kafka");
        assert_eq!(classify(&votes), Some(Bucket::MustHave));
    }

    #[test]
    fn test_bonus_beats_skills_when_both_present() {
        // One mention under Requirements, another under Bonus.
        let text = "Requirements: Docker. Bonus experience: Docker exposure.";
        let votes = votes_for(text, "docker");
        assert!(votes.has_skills_section);
        assert!(votes.has_bonus_experience);
        assert_eq!(classify(&votes), Some(Bucket::NiceToHave));
    }

    #[test]
    fn test_nice_phrase_yields_nice_to_have() {
        let votes = votes_for("Knowledge of Terraform would be advantageous.", "terraform");
        assert_eq!(classify(&votes), Some(Bucket::NiceToHave));
    }

    #[test]
    fn test_must_indicator_beats_nice_phrase() {
        let text = "Required: strong Python, though a bonus for us either way.";
        let votes = votes_for(text, "python");
        assert!(votes.has_must_indicator);
        assert_eq!(classify(&votes), Some(Bucket::MustHave));
    }

    #[test]
    fn test_no_signals_yields_neither_bucket() {
        let votes = votes_for("We write Python daily.", "python");
        assert_eq!(classify(&votes), None);
    }

    #[test]
    fn test_sets_stay_sorted() {
        let mut sets = ClassificationSets::default();
        sets.insert("Python".to_string(), Bucket::MustHave);
        sets.insert("Django".to_string(), Bucket::MustHave);
        let ordered: Vec<&String> = sets.must_have.iter().collect();
        assert_eq!(ordered, vec!["Django", "Python"]);
    }

    #[test]
    fn test_safety_net_never_fires_on_cascade_output() {
        // Every vote combination goes through the cascade exactly once per
        // term, so disjointness holds by construction.
        let text = "Requirements: Python, Django. Bonus experience: Kubernetes, Docker. \
                    Knowledge of Terraform would be advantageous.";
        let mut sets = ClassificationSets::default();
        for term in ["python", "django", "kubernetes", "docker", "terraform"] {
            let votes = votes_for(text, term);
            if let Some(bucket) = classify(&votes) {
                sets.insert(term.to_string(), bucket);
            }
        }
        assert_eq!(sets.resolve_overlaps(|t| votes_for(text, t).has_bonus_experience), 0);
        assert!(sets.must_have.contains("python"));
        assert!(sets.nice_to_have.contains("kubernetes"));
    }

    #[test]
    fn test_safety_net_keeps_nice_for_bonus_region_terms() {
        let mut sets = ClassificationSets::default();
        sets.must_have.insert("docker".to_string());
        sets.nice_to_have.insert("docker".to_string());
        assert_eq!(sets.resolve_overlaps(|_| true), 1);
        assert!(!sets.must_have.contains("docker"));
        assert!(sets.nice_to_have.contains("docker"));
    }

    #[test]
    fn test_safety_net_keeps_must_without_bonus_region() {
        let mut sets = ClassificationSets::default();
        sets.must_have.insert("docker".to_string());
        sets.nice_to_have.insert("docker".to_string());
        assert_eq!(sets.resolve_overlaps(|_| false), 1);
        assert!(sets.must_have.contains("docker"));
        assert!(!sets.nice_to_have.contains("docker"));
    }

    #[test]
    fn test_votes_fold_together() {
        let mut a = TermVotes {
            has_bonus_experience: true,
            ..TermVotes::default()
        };
        let b = TermVotes {
            has_must_indicator: true,
            ..TermVotes::default()
        };
        a.absorb_all(&b);
        assert!(a.has_bonus_experience);
        assert!(a.has_must_indicator);
        assert!(!a.has_skills_section);
    }

    #[test]
    fn test_rule_order_is_stable() {
        let names: Vec<&str> = RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            vec!["bonus-section", "skills-or-stack", "nice-phrase", "must-indicator"]
        );
    }
}
