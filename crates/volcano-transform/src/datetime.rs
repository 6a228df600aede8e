//! Eruption years written in free-text location comments.
//!
//! Comments such as `1883 ERUPTION`, `ERUPTION OF AUG 27, 1883` or
//! `BETWEEN 1912 AND 1913` carry the eruption year when the archive date
//! columns are empty. A comment is only searched for a year when it looks like
//! it describes a date; the year is then the single (or first of two)
//! four-digit token.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;
use volcano_model::{SampleIssue, SampleRecord};

/// Patterns that mark a comment as describing a date.
const DATE_PATTERNS: [&str; 11] = [
    r"ERUPTION ([0-9\-.]{3,})",
    r"([0-9\-.]{3,}) ERUPTION",
    r"[0-9]+ B.C",
    r"[0-9.]{5,}",
    r"(JAN(?:UARY)?|FEB(?:RUARY)?|MAR(?:CH)?|APR(?:IL)?|MAY|JUN(?:E)?|JUL(?:Y)|AUG(?:UST)?|SEPT(?:EMBER)?|OCT(?:OBER)?|NOV(?:EMBER)?|DEC(?:EMBER)?) ([0-9,\s]*)",
    r"[0-9\-.\s]{3,} AD",
    r"[0-9\-.\s]{3,} A. D.",
    r"BETWEEN [0-9]* AND [0-9]*",
    r"ERUPTION YEAR [0-9]*",
    r"ERUPTION YEARS [0-9]*",
    r"\d*/\d*/\d*",
];

static DATE_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    DATE_PATTERNS
        .iter()
        .filter_map(|pattern| Regex::new(pattern).ok())
        .collect()
});

/// Extracts an eruption year from free text; never fails.
pub fn extract_year(text: &str) -> Option<i32> {
    if !text.chars().any(|ch| ch.is_ascii_digit()) {
        return None;
    }
    let upper = text.to_uppercase();
    if !DATE_REGEXES.iter().any(|regex| regex.is_match(&upper)) {
        return None;
    }
    let normalized = upper.replace(['-', '.', '/', ','], " ");
    let years: Vec<&str> = normalized
        .split_whitespace()
        .filter(|token| token.len() == 4 && token.chars().all(|ch| ch.is_ascii_digit()))
        .collect();
    match years.as_slice() {
        [only] | [only, _] => only.parse().ok(),
        _ => None,
    }
}

/// Fills the inferred year of a sample without an explicit eruption year.
pub fn infer_sample_year(sample: &mut SampleRecord) -> Option<i32> {
    if let Some(year) = sample.eruption_year {
        return Some(year);
    }
    sample.inferred_year = extract_year(&sample.location_comment);
    if sample.inferred_year.is_none() {
        trace!(location = %sample.location, "no year in location comment");
        sample.push_issue(SampleIssue::DateExtractionMiss);
    }
    sample.inferred_year
}
