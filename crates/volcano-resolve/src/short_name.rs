//! Display names for aggregated sites.
//!
//! A cluster whose composite key is long and holds several labels gets a
//! short name picked from its tokens. Tokens are the pieces of the key split
//! on `,` and `-`.

use std::fmt;

use serde::Serialize;
use tracing::warn;
use volcano_standards::{OverridePrecedence, ShorteningRules};

/// Which rule produced a short name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShortNameRule {
    /// Curated override table entry.
    Override,
    /// Most repeated token.
    RepeatedToken,
    /// Shortest token, contained in at least two other tokens.
    ContainedToken,
    /// First token holding the major-peak keyword.
    MajorPeak,
    /// Shortest token; needs manual review.
    Fallback,
}

impl ShortNameRule {
    /// Whether the name carries a `(<N> SITES)` suffix.
    pub fn is_decorated(self) -> bool {
        matches!(
            self,
            ShortNameRule::RepeatedToken | ShortNameRule::ContainedToken | ShortNameRule::MajorPeak
        )
    }
}

/// A picked short name and the rule that picked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortName {
    pub name: String,
    pub rule: ShortNameRule,
    pub site_count: usize,
}

impl fmt::Display for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rule.is_decorated() {
            write!(f, "{} ({} SITES)", self.name, self.site_count)
        } else {
            f.write_str(&self.name)
        }
    }
}

/// Whether a composite key names an aggregated site.
pub fn is_aggregated(composite_key: &str, label_count: usize, rules: &ShorteningRules) -> bool {
    composite_key.chars().count() >= rules.min_length && label_count >= rules.min_labels
}

/// Splits a composite key into trimmed, non-empty tokens.
pub fn tokenize(composite_key: &str) -> Vec<&str> {
    composite_key
        .split([',', '-'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

fn shortest<'a>(tokens: &[&'a str]) -> Option<&'a str> {
    tokens
        .iter()
        .copied()
        .reduce(|best, token| {
            if token.chars().count() < best.chars().count() {
                token
            } else {
                best
            }
        })
}

fn most_repeated<'a>(tokens: &[&'a str]) -> Option<&'a str> {
    let count = |token: &str| tokens.iter().filter(|t| **t == token).count();
    let (token, repeats) = tokens
        .iter()
        .map(|token| (*token, count(*token)))
        .reduce(|best, next| if next.1 > best.1 { next } else { best })?;
    (repeats > 1).then_some(token)
}

fn contained_shortest<'a>(tokens: &[&'a str]) -> Option<&'a str> {
    let small = shortest(tokens)?;
    let containing = tokens
        .iter()
        .filter(|token| **token != small && token.contains(small))
        .count();
    (containing >= 2).then_some(small)
}

/// Picks the short name of an aggregated site.
///
/// Returns `None` when the key has no tokens.
pub fn shorten(composite_key: &str, label_count: usize, rules: &ShorteningRules) -> Option<ShortName> {
    let tokens = tokenize(composite_key);
    let pick = |name: &str, rule| ShortName {
        name: name.to_string(),
        rule,
        site_count: label_count,
    };

    if let Some(entry) = rules.find_override(&tokens, OverridePrecedence::First) {
        return Some(pick(&entry.name, ShortNameRule::Override));
    }
    if let Some(token) = most_repeated(&tokens) {
        return Some(pick(token, ShortNameRule::RepeatedToken));
    }
    if let Some(token) = contained_shortest(&tokens) {
        return Some(pick(token, ShortNameRule::ContainedToken));
    }
    let keyword = rules.major_peak_keyword.as_str();
    if let Some(token) = tokens.iter().copied().find(|token| token.contains(keyword)) {
        return Some(pick(token, ShortNameRule::MajorPeak));
    }
    if let Some(entry) = rules.find_override(&tokens, OverridePrecedence::Fallback) {
        return Some(pick(&entry.name, ShortNameRule::Override));
    }
    let fallback = shortest(&tokens)?;
    warn!(key = composite_key, name = fallback, "no naming rule matched aggregated site; review");
    Some(pick(fallback, ShortNameRule::Fallback))
}
