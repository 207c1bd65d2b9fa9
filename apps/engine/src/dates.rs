//! Posted-date extraction. Job boards render dates three ways: relative
//! ("Posted 13d ago"), numeric absolute ("21/01/2026", "2026-01-21") and
//! spelled-out ("21 January 2026"). The parser tries them in that order and
//! takes the first success.
//!
//! `now` is injected by the caller so extraction stays reproducible.

use std::sync::LazyLock;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;

static RELATIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*(days?|d|weeks?|w|months?|m|years?|y)\s*ago\b")
        .expect("valid regex")
});

static YMD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})\b").expect("valid regex"));

static DMY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})[-/](\d{1,2})[-/](\d{2,4})\b").expect("valid regex"));

static DAY_MONTH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})\s+([A-Za-z]+)\s+(\d{4})\b").expect("valid regex"));

/// Lines mentioning "Posted …" get first crack at parsing; a date sitting
/// next to that word is far more likely to be the posting date than e.g. a
/// start date in the body.
static POSTED_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bposted\b|\bdate\s+posted\b").expect("valid regex"));

/// Parses one date-bearing snippet. Relative phrases are resolved against
/// `now`; months count as 30 days and years as 365.
pub fn parse_posted_date(snippet: &str, now: DateTime<Utc>) -> Option<NaiveDate> {
    if let Some(cap) = RELATIVE_RE.captures(snippet) {
        let n: i64 = cap[1].parse().ok()?;
        let days = match cap[2].to_lowercase().chars().next()? {
            'd' => n,
            'w' => n * 7,
            'm' => n * 30,
            'y' => n * 365,
            _ => return None,
        };
        return Some((now - Duration::days(days)).date_naive());
    }

    if let Some(cap) = YMD_RE.captures(snippet) {
        let (y, m, d) = (cap[1].parse().ok()?, cap[2].parse().ok()?, cap[3].parse().ok()?);
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return Some(date);
        }
    }

    if let Some(cap) = DMY_RE.captures(snippet) {
        let d: u32 = cap[1].parse().ok()?;
        let m: u32 = cap[2].parse().ok()?;
        let mut y: i32 = cap[3].parse().ok()?;
        if cap[3].len() == 2 {
            y += 2000;
        }
        if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
            return Some(date);
        }
    }

    if let Some(cap) = DAY_MONTH_YEAR_RE.captures(snippet) {
        let d: u32 = cap[1].parse().ok()?;
        let y: i32 = cap[3].parse().ok()?;
        if let Some(m) = month_number(&cap[2]) {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return Some(date);
            }
        }
    }

    None
}

/// Extracts the posting date from a whole JD text. "Posted …" lines are
/// tried first, then the text as a whole. Absent when nothing parses.
pub fn extract_posted_date(text: &str, now: DateTime<Utc>) -> Option<NaiveDate> {
    for line in text.lines() {
        if POSTED_LINE_RE.is_match(line) {
            if let Some(date) = parse_posted_date(line, now) {
                return Some(date);
            }
        }
    }
    parse_posted_date(text, now)
}

fn month_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "january" | "jan" => Some(1),
        "february" | "feb" => Some(2),
        "march" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "may" => Some(5),
        "june" | "jun" => Some(6),
        "july" | "jul" => Some(7),
        "august" | "aug" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "october" | "oct" => Some(10),
        "november" | "nov" => Some(11),
        "december" | "dec" => Some(12),
        _ => None,
    }
}
