//! Override table schema and loaders.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::embedded::{DEFAULT_OVERRIDES, DEFAULT_OVERRIDES_ORIGIN};
use crate::error::{Result, StandardsError};

pub const OVERRIDES_SCHEMA: &str = "volcano.overrides";
pub const OVERRIDES_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Overrides {
    pub manifest: OverridesHeader,
    #[serde(default)]
    pub notes: Option<OverridesNotes>,
    #[serde(default)]
    pub registry: RegistryOverrides,
    pub shortening: ShorteningRules,
    #[serde(default)]
    pub archive: ArchiveOverrides,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverridesHeader {
    pub schema: String,
    pub schema_version: u32,
    /// Registry release the tables were last checked against.
    pub registry_release: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverridesNotes {
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryOverrides {
    /// Volcano numbers whose display names collide.
    #[serde(default)]
    pub disambiguate: Vec<u32>,
    #[serde(default)]
    pub rename: Vec<RegistryRename>,
}

impl RegistryOverrides {
    pub fn needs_disambiguation(&self, volcano: u32) -> bool {
        self.disambiguate.contains(&volcano)
    }

    pub fn rename_for(&self, volcano: u32) -> Option<&str> {
        self.rename
            .iter()
            .find(|entry| entry.volcano == volcano)
            .map(|entry| entry.name.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryRename {
    pub volcano: u32,
    pub name: String,
}

/// Parameters and exceptions for naming aggregated sites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShorteningRules {
    /// Composite keys at least this long are aggregated sites.
    pub min_length: usize,
    /// ... and must hold at least this many labels.
    pub min_labels: usize,
    /// Token keyword marking a major peak.
    pub major_peak_keyword: String,
    #[serde(default, rename = "override")]
    pub overrides: Vec<ShortNameOverride>,
}

impl ShorteningRules {
    /// First override with the given precedence whose token is among `tokens`.
    pub fn find_override<'a>(
        &'a self,
        tokens: &[&str],
        precedence: OverridePrecedence,
    ) -> Option<&'a ShortNameOverride> {
        self.overrides.iter().find(|entry| {
            entry.precedence == precedence && tokens.iter().any(|token| *token == entry.token)
        })
    }
}

impl Default for ShorteningRules {
    fn default() -> Self {
        Self {
            min_length: 80,
            min_labels: 2,
            major_peak_keyword: "MOUNT".to_string(),
            overrides: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortNameOverride {
    pub token: String,
    pub name: String,
    #[serde(default)]
    pub precedence: OverridePrecedence,
}

/// When an override is consulted relative to the algorithmic rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverridePrecedence {
    /// Before the repeated-token rule.
    First,
    /// After the keyword rule, before the shortest-token fallback.
    #[default]
    Fallback,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveOverrides {
    #[serde(default)]
    pub region_qualified: Vec<RegionQualifiedLabel>,
}

impl ArchiveOverrides {
    pub fn region_rule(&self, label: &str) -> Option<&RegionQualifiedLabel> {
        self.region_qualified
            .iter()
            .find(|rule| rule.label.eq_ignore_ascii_case(label.trim()))
    }
}

/// An archive label whose rows are selected by site and region path components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionQualifiedLabel {
    pub label: String,
    pub site: String,
    pub region: String,
    /// Zero-based index into the `/`-separated location path.
    pub site_component: usize,
    pub region_component: usize,
}

impl RegionQualifiedLabel {
    /// Checks trimmed location path components against the rule.
    pub fn matches(&self, components: &[&str]) -> bool {
        let component_is = |index: usize, expected: &str| {
            components
                .get(index)
                .is_some_and(|value| value.trim().eq_ignore_ascii_case(expected))
        };
        component_is(self.site_component, &self.site)
            && component_is(self.region_component, &self.region)
    }
}

/// Loads the embedded default override table.
pub fn load_default_overrides() -> Result<Overrides> {
    parse_overrides(DEFAULT_OVERRIDES, DEFAULT_OVERRIDES_ORIGIN)
}

/// Loads an override table from disk.
pub fn load_overrides_from_path(path: &Path) -> Result<Overrides> {
    let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    parse_overrides(&contents, &path.display().to_string())
}

/// Parses and validates an override table.
pub fn parse_overrides(contents: &str, origin: &str) -> Result<Overrides> {
    let overrides: Overrides = toml::from_str(contents).map_err(|e| StandardsError::Toml {
        origin: origin.to_string(),
        source: e,
    })?;
    validate_overrides(&overrides, origin)?;
    Ok(overrides)
}

fn validate_overrides(overrides: &Overrides, origin: &str) -> Result<()> {
    if overrides.manifest.schema != OVERRIDES_SCHEMA {
        return Err(StandardsError::invalid(
            origin,
            format!("unsupported schema: {}", overrides.manifest.schema),
        ));
    }
    if overrides.manifest.schema_version != OVERRIDES_SCHEMA_VERSION {
        return Err(StandardsError::invalid(
            origin,
            format!(
                "unsupported schema_version: {}",
                overrides.manifest.schema_version
            ),
        ));
    }

    let shortening = &overrides.shortening;
    if shortening.min_labels < 2 {
        return Err(StandardsError::invalid(
            origin,
            "shortening.min_labels must be at least 2",
        ));
    }
    if shortening.major_peak_keyword.trim().is_empty() {
        return Err(StandardsError::invalid(
            origin,
            "shortening.major_peak_keyword is empty",
        ));
    }
    let mut tokens = BTreeSet::new();
    for entry in &shortening.overrides {
        if entry.token.trim().is_empty() || entry.name.trim().is_empty() {
            return Err(StandardsError::invalid(
                origin,
                "shortening override with empty token or name",
            ));
        }
        if !tokens.insert(entry.token.as_str()) {
            return Err(StandardsError::invalid(
                origin,
                format!("duplicate shortening override token: {}", entry.token),
            ));
        }
    }

    let mut renamed = BTreeSet::new();
    for entry in &overrides.registry.rename {
        if !renamed.insert(entry.volcano) {
            return Err(StandardsError::invalid(
                origin,
                format!("duplicate registry rename for volcano {}", entry.volcano),
            ));
        }
    }

    for rule in &overrides.archive.region_qualified {
        if rule.site_component == rule.region_component {
            return Err(StandardsError::invalid(
                origin,
                format!("region-qualified label {} uses one component twice", rule.label),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_overrides_parse() {
        let overrides = load_default_overrides().expect("embedded overrides");
        assert_eq!(overrides.manifest.schema_version, 1);
        assert_eq!(overrides.registry.disambiguate.len(), 10);
        assert!(overrides.registry.needs_disambiguation(353060));
        assert_eq!(overrides.registry.rename_for(371030), Some("Krysuvik"));
        assert_eq!(overrides.registry.rename_for(1), None);
        assert_eq!(overrides.shortening.min_length, 80);
        assert_eq!(overrides.shortening.major_peak_keyword, "MOUNT");
        assert!(overrides.archive.region_rule("sumbing - java").is_some());
    }

    #[test]
    fn test_find_override_respects_precedence() {
        let overrides = load_default_overrides().expect("embedded overrides");
        let tokens = ["GRANDE DECOUVERTE", "SOUFRIERE"];
        let first = overrides
            .shortening
            .find_override(&tokens, OverridePrecedence::First)
            .expect("first override");
        assert_eq!(first.name, "SOUFRIERE GUADELOUPE");
        assert!(
            overrides
                .shortening
                .find_override(&tokens, OverridePrecedence::Fallback)
                .is_none()
        );
    }

    #[test]
    fn test_region_rule_matches_components() {
        let overrides = load_default_overrides().expect("embedded overrides");
        let rule = overrides
            .archive
            .region_rule("SUMBING - JAVA")
            .expect("rule");
        assert!(rule.matches(&["INDONESIA", "SUNDA ARC", " JAVA ", " SUMBING"]));
        assert!(!rule.matches(&["INDONESIA", "SUNDA ARC", "SUMATRA", "SUMBING"]));
        assert!(!rule.matches(&["INDONESIA"]));
    }

    #[test]
    fn test_rejects_unknown_schema_version() {
        let text = DEFAULT_OVERRIDES.replace("schema_version = 1", "schema_version = 9");
        let err = parse_overrides(&text, "test").expect_err("version check");
        assert!(err.to_string().contains("unsupported schema_version: 9"));
    }

    #[test]
    fn test_rejects_duplicate_override_tokens() {
        let text = format!(
            "{DEFAULT_OVERRIDES}\n[[shortening.override]]\ntoken = \"SUMISUJIMA\"\nname = \"X\"\n"
        );
        let err = parse_overrides(&text, "test").expect_err("duplicate check");
        assert!(matches!(err, StandardsError::InvalidOverrides { .. }));
    }
}
