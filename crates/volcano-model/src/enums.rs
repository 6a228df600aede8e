//! Type-safe enumerations for values stored as free text in the source tables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Analysed material of an archive sample.
///
/// Archive cells look like `WR [1234]` or `GL [56]`; only the code before the
/// bracket is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Material {
    /// Whole rock.
    WholeRock,
    /// Volcanic glass.
    Glass,
    /// Melt or fluid inclusion.
    Inclusion,
    /// Mineral separate.
    Mineral,
    /// Anything else, including blank cells.
    Unknown,
}

impl Material {
    pub const ALL: [Material; 5] = [
        Material::WholeRock,
        Material::Glass,
        Material::Inclusion,
        Material::Mineral,
        Material::Unknown,
    ];

    /// Returns the archive code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Material::WholeRock => "WR",
            Material::Glass => "GL",
            Material::Inclusion => "INC",
            Material::Mineral => "MIN",
            Material::Unknown => "UNKNOWN",
        }
    }

    /// Parses an archive `MATERIAL` cell, ignoring any bracketed suffix.
    pub fn from_archive(raw: &str) -> Self {
        let code = raw.split('[').next().unwrap_or_default();
        code.parse().unwrap_or(Material::Unknown)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Material {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "WR" => Ok(Material::WholeRock),
            "GL" => Ok(Material::Glass),
            "INC" => Ok(Material::Inclusion),
            "MIN" => Ok(Material::Mineral),
            "UNKNOWN" => Ok(Material::Unknown),
            _ => Err(format!("Unknown material: {s}")),
        }
    }
}

/// Registry eruption category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EruptionCategory {
    Confirmed,
    Uncertain,
    Discredited,
    Other,
}

impl EruptionCategory {
    /// Returns the registry spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            EruptionCategory::Confirmed => "Confirmed Eruption",
            EruptionCategory::Uncertain => "Uncertain Eruption",
            EruptionCategory::Discredited => "Discredited Eruption",
            EruptionCategory::Other => "Other",
        }
    }

    /// Lenient parse used by the loaders; unrecognized text maps to `Other`.
    pub fn from_registry(raw: &str) -> Self {
        raw.parse().unwrap_or(EruptionCategory::Other)
    }
}

impl fmt::Display for EruptionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EruptionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "CONFIRMED ERUPTION" | "CONFIRMED" => Ok(EruptionCategory::Confirmed),
            "UNCERTAIN ERUPTION" | "UNCERTAIN" => Ok(EruptionCategory::Uncertain),
            "DISCREDITED ERUPTION" | "DISCREDITED" => Ok(EruptionCategory::Discredited),
            _ => Err(format!("Unknown eruption category: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_from_archive_cell() {
        assert_eq!(Material::from_archive("WR [12345]"), Material::WholeRock);
        assert_eq!(Material::from_archive("gl"), Material::Glass);
        assert_eq!(Material::from_archive("INC [7]"), Material::Inclusion);
        assert_eq!(Material::from_archive("MIN [1] / WR"), Material::Mineral);
        assert_eq!(Material::from_archive("ROCK [1]"), Material::Unknown);
        assert_eq!(Material::from_archive(""), Material::Unknown);
    }

    #[test]
    fn eruption_category_parse() {
        assert_eq!(
            EruptionCategory::from_registry("Confirmed Eruption"),
            EruptionCategory::Confirmed
        );
        assert_eq!(
            EruptionCategory::from_registry(" uncertain eruption"),
            EruptionCategory::Uncertain
        );
        assert_eq!(EruptionCategory::from_registry("?"), EruptionCategory::Other);
    }
}
