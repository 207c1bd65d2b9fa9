//! Dictionary matcher — boundary-aware, case-insensitive occurrence search.
//!
//! Ordinary `\b` word-boundary matching fails for aliases like "C#" or
//! ".NET" (the boundary assertion needs a word character on one side), so
//! the matcher scans manually and treats any non-alphanumeric character as a
//! valid boundary. Pure function of (text, needle); no side effects.

/// One concrete location where a term was found in the source text.
/// Offsets are byte offsets into the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub start: usize,
    pub end: usize,
}

/// Finds every boundary-aware, case-insensitive occurrence of `needle` in
/// `text`. Matches never overlap; the scan resumes after each hit.
pub fn find_occurrences(text: &str, needle: &str) -> Vec<Occurrence> {
    if needle.is_empty() {
        return Vec::new();
    }

    let haystack = text.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();
    let mut occurrences = Vec::new();
    let mut from = 0;

    while let Some(rel) = haystack[from..].find(&needle) {
        let start = from + rel;
        let end = start + needle.len();
        if boundary_before(&haystack, start) && boundary_after(&haystack, end) {
            occurrences.push(Occurrence { start, end });
            from = end;
        } else {
            // resume on a char boundary; a rejected match can start on a
            // multi-byte character
            from = start + 1;
            while !haystack.is_char_boundary(from) {
                from += 1;
            }
        }
    }

    occurrences
}

/// Occurrence count for a term, using the same boundary rule.
pub fn count_occurrences(text: &str, needle: &str) -> u32 {
    find_occurrences(text, needle).len() as u32
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn boundary_before(haystack: &str, start: usize) -> bool {
    match haystack[..start].chars().next_back() {
        None => true,
        Some(c) => !is_word_char(c),
    }
}

fn boundary_after(haystack: &str, end: usize) -> bool {
    match haystack[end..].chars().next() {
        None => true,
        Some(c) => !is_word_char(c),
    }
}
