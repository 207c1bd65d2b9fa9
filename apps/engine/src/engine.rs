//! Hybrid orchestrator — composes the matcher, context classifier, scorer,
//! discoverer, filters and field extractors into one extraction call, and
//! optionally merges an externally produced candidate profile.
//!
//! The rule-based pipeline is pure and synchronous; the only suspension
//! point is the optional candidate source call, bounded by a caller-supplied
//! timeout and always recovered by falling back to the rule-based result.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::classify::{classify, Bucket, ClassificationSets, TermVotes};
use crate::context::{ContextIndex, TITLE_WINDOW};
use crate::dates::extract_posted_date;
use crate::dictionary::{SkillCategory, SkillDictionary};
use crate::discovery::extract_dynamic_terms;
use crate::fields::{extract_certifications, extract_degree_required, extract_years_required};
use crate::filter::NoiseFilter;
use crate::llm_client::{AiCandidate, CandidateSource};
use crate::matcher::find_occurrences;
use crate::profile::{sort_keywords, ExtractionMethod, RequirementsProfile, ScoredKeyword};
use crate::role::{infer_role_family, infer_seniority};
use crate::scoring::score_term;

/// Per-canonical-term working state. Each alias is scored independently and
/// only the highest-scoring alias's score/count survive; classification
/// votes are still ORed across every alias occurrence.
struct TermAccum {
    display: String,
    category: SkillCategory,
    best_score: f64,
    best_count: u32,
    votes: TermVotes,
    from_dictionary: bool,
}

pub struct Engine {
    dict: SkillDictionary,
    noise: NoiseFilter,
}

impl Engine {
    pub fn new(dict: SkillDictionary) -> Self {
        Engine {
            dict,
            noise: NoiseFilter::default(),
        }
    }

    pub fn with_embedded_dictionary() -> Self {
        Engine::new(SkillDictionary::embedded())
    }

    /// Pure rule-based extraction of one JD text. Never fails: malformed
    /// input degrades to empty or absent fields. `now` anchors relative
    /// posted-date phrases so extraction stays reproducible.
    pub fn extract(
        &self,
        jd_text: &str,
        title: Option<&str>,
        now: DateTime<Utc>,
    ) -> RequirementsProfile {
        let index = ContextIndex::new(jd_text);

        // The title region is the explicit title plus the first 200 chars
        // of the text; a bare substring hit there is enough for the title
        // bonus.
        let head_end = jd_text
            .char_indices()
            .nth(TITLE_WINDOW)
            .map(|(i, _)| i)
            .unwrap_or(jd_text.len());
        let title_region = format!(
            "{} {}",
            title.unwrap_or("").to_lowercase(),
            jd_text[..head_end].to_lowercase()
        );

        // BTreeMap keyed by lowercased canonical term keeps iteration
        // order deterministic.
        let mut accum: BTreeMap<String, TermAccum> = BTreeMap::new();

        for (alias, entry) in self.dict.aliases() {
            let occurrences = find_occurrences(jd_text, alias);
            if occurrences.is_empty() {
                continue;
            }
            let key = entry.term.to_lowercase();
            let slot = accum.entry(key).or_insert_with(|| TermAccum {
                display: entry.term.clone(),
                category: entry.category,
                best_score: 0.0,
                best_count: 0,
                votes: TermVotes::default(),
                from_dictionary: true,
            });
            let mut alias_signals = Vec::with_capacity(occurrences.len());
            for occ in &occurrences {
                let signals = index.classify(occ);
                slot.votes.absorb(&signals);
                alias_signals.push(signals);
            }
            let title_hit = title_region.contains(&alias.to_lowercase())
                || title_region.contains(&entry.term.to_lowercase());
            let alias_score = score_term(entry.category, &alias_signals, title_hit);
            if alias_score > slot.best_score {
                slot.best_score = alias_score;
                slot.best_count = alias_signals.len() as u32;
            }
        }

        // Discovered terms. A dictionary collision keeps the dictionary
        // entry's term and category but takes the higher score and count;
        // non-colliding terms are inserted with their discovery score.
        for discovered in extract_dynamic_terms(jd_text) {
            let mut votes = TermVotes::default();
            for occ in find_occurrences(jd_text, &discovered.term) {
                votes.absorb(&index.classify(&occ));
            }
            let (key, display, category, from_dictionary) =
                match self.dict.resolve(&discovered.term) {
                    Some(entry) => (
                        entry.term.to_lowercase(),
                        entry.term.clone(),
                        entry.category,
                        true,
                    ),
                    None => (
                        discovered.term.to_lowercase(),
                        discovered.term.clone(),
                        discovered.category,
                        false,
                    ),
                };
            let slot = accum.entry(key).or_insert_with(|| TermAccum {
                display,
                category,
                best_score: 0.0,
                best_count: 0,
                votes: TermVotes::default(),
                from_dictionary,
            });
            slot.votes.absorb_all(&votes);
            if discovered.score > slot.best_score {
                slot.best_score = discovered.score;
            }
            if discovered.count > slot.best_count {
                slot.best_count = discovered.count;
            }
        }

        let mut keywords = Vec::new();
        let mut sets = ClassificationSets::default();
        let mut bonus_terms = Vec::new();

        for slot in accum.into_values() {
            if self.noise.is_noise(&slot.display, slot.from_dictionary) {
                continue;
            }
            keywords.push(ScoredKeyword {
                term: slot.display.clone(),
                category: slot.category,
                score: slot.best_score,
                count: slot.best_count,
            });
            if slot.votes.has_bonus_experience {
                bonus_terms.push(slot.display.clone());
            }
            if let Some(bucket) = classify(&slot.votes) {
                sets.insert(slot.display, bucket);
            }
        }

        let moved = sets.resolve_overlaps(|term| bonus_terms.iter().any(|t| t == term));
        if moved > 0 {
            warn!(moved, "classification cascade produced overlapping sets");
        }

        sort_keywords(&mut keywords);
        debug!(keywords = keywords.len(), "rule-based extraction complete");

        RequirementsProfile {
            keywords,
            must_have: sets.must_have.into_iter().collect(),
            nice_to_have: sets.nice_to_have.into_iter().collect(),
            years_required: extract_years_required(jd_text),
            degree_required: extract_degree_required(jd_text),
            certifications: extract_certifications(jd_text),
            role_family: infer_role_family(title.unwrap_or(""), jd_text).map(str::to_string),
            seniority: infer_seniority(title.unwrap_or(""), jd_text),
            posted_date: extract_posted_date(jd_text, now),
            summary: None,
            extraction_method: ExtractionMethod::RuleBased,
        }
    }

    /// Rule-based extraction plus an optional externally produced candidate.
    /// A candidate-source failure or timeout falls back to the rule-based
    /// profile; it is never surfaced to the caller.
    pub async fn extract_hybrid(
        &self,
        jd_text: &str,
        title: Option<&str>,
        company: Option<&str>,
        source: &dyn CandidateSource,
        timeout: Duration,
        now: DateTime<Utc>,
    ) -> RequirementsProfile {
        let mut profile = self.extract(jd_text, title, now);

        let candidate =
            match tokio::time::timeout(timeout, source.propose(jd_text, title, company)).await {
                Ok(Ok(candidate)) => candidate,
                Ok(Err(err)) => {
                    warn!(error = %err, "candidate source failed, using rule-based profile");
                    return profile;
                }
                Err(_) => {
                    warn!(?timeout, "candidate source timed out, using rule-based profile");
                    return profile;
                }
            };

        self.merge_candidate(&mut profile, candidate);
        profile
    }

    /// Field-level merge: the candidate's value wins when present, except
    /// role/seniority where a collapsed sentinel falls back to the
    /// rule-based inference. `extraction_method` records which path
    /// supplied the final role/seniority pair.
    fn merge_candidate(&self, profile: &mut RequirementsProfile, candidate: AiCandidate) {
        if !candidate.keywords.is_empty() {
            let by_key: BTreeMap<String, ScoredKeyword> = profile
                .keywords
                .iter()
                .map(|k| (k.term.to_lowercase(), k.clone()))
                .collect();
            let mut seen = std::collections::HashSet::new();
            let mut keywords: Vec<ScoredKeyword> = candidate
                .keywords
                .iter()
                .filter(|term| seen.insert(term.to_lowercase()))
                .map(|term| match by_key.get(&term.to_lowercase()) {
                    Some(existing) => existing.clone(),
                    None => ScoredKeyword {
                        term: term.clone(),
                        category: self
                            .dict
                            .category_of(term)
                            .unwrap_or(SkillCategory::Unknown),
                        score: 1.0,
                        count: 1,
                    },
                })
                .collect();
            sort_keywords(&mut keywords);
            profile.keywords = keywords;
        }

        if !candidate.must_have.is_empty() || !candidate.nice_to_have.is_empty() {
            let mut sets = ClassificationSets::default();
            for term in candidate.must_have {
                sets.insert(term, Bucket::MustHave);
            }
            for term in candidate.nice_to_have {
                sets.insert(term, Bucket::NiceToHave);
            }
            // The candidate listed the overlapping term as nice-to-have
            // itself; that explicit call wins.
            sets.resolve_overlaps(|_| true);
            profile.must_have = sets.must_have.into_iter().collect();
            profile.nice_to_have = sets.nice_to_have.into_iter().collect();
        }

        if candidate.years_required.is_some() {
            profile.years_required = candidate.years_required;
        }
        if candidate.degree_required.is_some() {
            profile.degree_required = candidate.degree_required;
        }
        if !candidate.certifications.is_empty() {
            let mut certs = candidate.certifications;
            certs.sort();
            certs.dedup();
            profile.certifications = certs;
        }
        if candidate.posted_date.is_some() {
            profile.posted_date = candidate.posted_date;
        }
        if candidate.summary.is_some() {
            profile.summary = candidate.summary;
        }

        let ai_answered = candidate.role_family.is_some() || candidate.seniority.is_some();
        if candidate.role_family.is_some() {
            profile.role_family = candidate.role_family;
        }
        if candidate.seniority.is_some() {
            profile.seniority = candidate.seniority;
        }
        if ai_answered {
            profile.extraction_method = ExtractionMethod::AiEnhanced;
        }
    }
}
