//! Context classifier — decides, for each occurrence, which textual regions
//! it falls in: title, heading/bullet, must-have, nice-to-have/bonus, and
//! tech-stack. The signals are independent booleans; scoring turns them into
//! bonuses and the must/nice classifier turns them into votes.

use std::sync::LazyLock;

use regex::Regex;

use crate::matcher::Occurrence;

/// The title region is the first 200 characters of the text.
pub const TITLE_WINDOW: usize = 200;
/// Heading/bullet anchors are searched in the 200 chars before an occurrence.
const HEADING_WINDOW: usize = 200;
/// Must-have indicator phrases are searched in the 500 chars before.
const MUST_WINDOW: usize = 500;
/// Nice-to-have contextual phrases are searched within 300 chars either side
/// (phrases like "… would be advantageous" trail the term they qualify).
const NICE_PHRASE_WINDOW: usize = 300;
/// A bonus-section heading reaches at most 2000 chars forward.
const BONUS_SECTION_REACH: usize = 2000;
/// A tech-stack heading reaches at most 500 chars forward.
const TECH_STACK_REACH: usize = 500;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^#{1,6}\s+\S|^[A-Z][^.!?\n]{0,80}:\s*$|^\s*[-*•]\s+\S").expect("valid regex")
});

static MUST_INDICATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\brequirements?\b|\bmust\s+have\b|\bessential\b|\bwe\s+require\b|\brequired\b|\bmandatory\b|\bqualifications?\b|\bneeded\b|\bnecessary\b",
    )
    .expect("valid regex")
});

static NICE_PHRASE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bnice\s+to\s+have\b|\bpreferred\b|\bbonus\b|\bdesirable\b|\badvantage(?:ous)?\b|\bplus\b|\bwould\s+be\s+great\b|\boptional\b",
    )
    .expect("valid regex")
});

static BONUS_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bbonus(?:\s+experience)?\s*:").expect("valid regex"));

static SKILLS_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:skills\s+and\s+tools|skills|requirements?|qualifications?)\s*:")
        .expect("valid regex")
});

static TECH_STACK_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:tech\s+stack|technologies|stack)\s*:").expect("valid regex")
});

/// Independent context signals for one occurrence. Not mutually exclusive,
/// except that the three nice-to-have checks are nested: an occurrence
/// inside a bonus section never reports skills-section membership, and an
/// occurrence inside a skills section never reports a nice phrase (the
/// skills section overrides "would be advantageous" phrasing nearby).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextSignals {
    pub in_title: bool,
    pub in_heading: bool,
    pub in_must_section: bool,
    pub in_bonus_section: bool,
    pub in_skills_section: bool,
    pub has_nice_phrase: bool,
    pub in_tech_stack: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkerKind {
    Bonus,
    Skills,
    TechStack,
}

#[derive(Debug)]
struct Marker {
    kind: MarkerKind,
    start: usize,
    end: usize,
}

/// Precomputed per-text index of section markers. Built once per extraction
/// call; classification of each occurrence is then a cheap lookup plus a few
/// windowed regex searches.
pub struct ContextIndex<'a> {
    text: &'a str,
    markers: Vec<Marker>,
    /// Byte offset where the 200-character title region ends.
    title_end: usize,
}

impl<'a> ContextIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let title_end = text
            .char_indices()
            .nth(TITLE_WINDOW)
            .map(|(i, _)| i)
            .unwrap_or(text.len());
        let mut markers = Vec::new();
        for m in BONUS_MARKER_RE.find_iter(text) {
            markers.push(Marker {
                kind: MarkerKind::Bonus,
                start: m.start(),
                end: m.end(),
            });
        }
        for m in SKILLS_MARKER_RE.find_iter(text) {
            markers.push(Marker {
                kind: MarkerKind::Skills,
                start: m.start(),
                end: m.end(),
            });
        }
        for m in TECH_STACK_MARKER_RE.find_iter(text) {
            markers.push(Marker {
                kind: MarkerKind::TechStack,
                start: m.start(),
                end: m.end(),
            });
        }
        markers.sort_by_key(|m| m.start);
        ContextIndex {
            text,
            markers,
            title_end,
        }
    }

    pub fn classify(&self, occ: &Occurrence) -> ContextSignals {
        let pos = occ.start;
        let mut signals = ContextSignals {
            in_title: pos < self.title_end,
            ..ContextSignals::default()
        };

        let heading_window = self.window_before(pos, HEADING_WINDOW);
        signals.in_heading = HEADING_RE.is_match(heading_window);

        let must_window = self.window_before(pos, MUST_WINDOW);
        signals.in_must_section = MUST_INDICATOR_RE.is_match(must_window);

        // Nearest section marker that ends at or before the occurrence. The
        // next marker of any kind closes the previous section, so taking the
        // nearest one also guarantees no other heading intervenes.
        match self.markers.iter().rev().find(|m| m.end <= pos) {
            Some(m) if m.kind == MarkerKind::Bonus && pos - m.start <= BONUS_SECTION_REACH => {
                signals.in_bonus_section = true;
            }
            Some(m) if m.kind == MarkerKind::Skills => {
                signals.in_skills_section = true;
            }
            Some(m) if m.kind == MarkerKind::TechStack && pos - m.start <= TECH_STACK_REACH => {
                signals.in_tech_stack = true;
            }
            _ => {}
        }

        // Contextual nice phrase, only when no more specific section check
        // already fired for this occurrence.
        if !signals.in_bonus_section && !signals.in_skills_section {
            let around = self.window_around(pos, NICE_PHRASE_WINDOW);
            signals.has_nice_phrase = NICE_PHRASE_RE.is_match(around);
        }

        signals
    }

    fn window_before(&self, pos: usize, width: usize) -> &str {
        let start = clamp_boundary(self.text, pos.saturating_sub(width));
        let end = clamp_boundary(self.text, pos);
        &self.text[start..end]
    }

    fn window_around(&self, pos: usize, width: usize) -> &str {
        let start = clamp_boundary(self.text, pos.saturating_sub(width));
        let end = clamp_boundary(self.text, (pos + width).min(self.text.len()));
        &self.text[start..end]
    }
}

/// Walks an index back to the nearest char boundary so windowed slices stay
/// valid on multi-byte input.
fn clamp_boundary(text: &str, mut i: usize) -> usize {
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::find_occurrences;

    fn signals_for(text: &str, term: &str) -> ContextSignals {
        let index = ContextIndex::new(text);
        let occ = &find_occurrences(text, term)[0];
        index.classify(occ)
    }

    #[test]
    fn test_title_context_within_first_200_chars() {
        let text = "Senior Python Engineer wanted.";
        assert!(signals_for(text, "python").in_title);
    }

    #[test]
    fn test_title_context_not_beyond_200_chars() {
        let text = format!("{}Python here", "x".repeat(250));
        assert!(!signals_for(&text, "python").in_title);
    }

    #[test]
    fn test_title_window_counts_chars_not_bytes() {
        // 150 two-byte chars push the term past byte 200 but not char 200
        let text = format!("{} Python", "é".repeat(150));
        assert!(signals_for(&text, "python").in_title);
    }

    #[test]
    fn test_heading_context_after_bullet() {
        let text = "Responsibilities\n- build services with Python\n";
        assert!(signals_for(text, "python").in_heading);
    }

    #[test]
    fn test_heading_context_after_colon_heading() {
        let text = "About\n\nKey Skills:\nPython and more";
        assert!(signals_for(text, "python").in_heading);
    }

    #[test]
    fn test_must_indicator_in_preceding_window() {
        let text = "Requirements: strong Python background.";
        let s = signals_for(text, "python");
        assert!(s.in_must_section);
    }

    #[test]
    fn test_no_must_indicator_without_phrase() {
        let text = "We enjoy writing Python at our company.";
        assert!(!signals_for(text, "python").in_must_section);
    }

    #[test]
    fn test_bonus_section_membership() {
        let text = "Requirements: Python, Django. Bonus experience: Kubernetes.";
        let s = signals_for(text, "kubernetes");
        assert!(s.in_bonus_section);
        assert!(!s.in_skills_section);
    }

    #[test]
    fn test_short_bonus_marker() {
        let text = "Bonus: Terraform knowledge.";
        assert!(signals_for(text, "terraform").in_bonus_section);
    }

    #[test]
    fn test_requirements_section_not_bonus() {
        let text = "Requirements: Python, Django. Bonus experience: Kubernetes.";
        let s = signals_for(text, "django");
        assert!(s.in_skills_section);
        assert!(!s.in_bonus_section);
    }

    #[test]
    fn test_skills_section_suppresses_nice_phrase() {
        // "would be advantageous" nearby, but the term sits under a skills
        // heading — skills-section membership wins.
        let text = "Skills and Tools: Docker, Terraform. These would be advantageous to have.";
        let s = signals_for(text, "docker");
        assert!(s.in_skills_section);
        assert!(!s.has_nice_phrase);
    }

    #[test]
    fn test_nice_phrase_outside_any_section() {
        let text = "However, knowledge of Terraform would be advantageous.";
        let s = signals_for(text, "terraform");
        assert!(s.has_nice_phrase);
        assert!(!s.in_bonus_section);
        assert!(!s.in_skills_section);
    }

    #[test]
    fn test_tech_stack_section() {
        let text = "Our tech stack: Python, Kafka, Postgres.";
        let s = signals_for(text, "kafka");
        assert!(s.in_tech_stack);
    }

    #[test]
    fn test_bonus_heading_closes_tech_stack_section() {
        let text = "Tech stack: Python. Bonus experience: Kafka.";
        let s = signals_for(text, "kafka");
        assert!(!s.in_tech_stack);
        assert!(s.in_bonus_section);
    }

    #[test]
    fn test_bonus_reach_is_bounded() {
        let text = format!("Bonus experience: {} Kubernetes", "x".repeat(2100));
        let s = signals_for(&text, "kubernetes");
        assert!(!s.in_bonus_section);
    }

    #[test]
    fn test_tech_stack_reach_is_bounded() {
        let text = format!("Technologies: {} Kafka", "x".repeat(600));
        let s = signals_for(&text, "kafka");
        assert!(!s.in_tech_stack);
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let text = "désolé — Requirements: Python, naïveté aside.";
        let s = signals_for(text, "python");
        assert!(s.in_must_section);
    }
}
