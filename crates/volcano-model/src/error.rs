use thiserror::Error;

use crate::ids::VolcanoId;

/// Errors raised while constructing model values from raw text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid volcano number: '{0}'")]
    InvalidVolcanoId(String),
    #[error("invalid eruption number: '{0}'")]
    InvalidEruptionNumber(String),
    #[error("unknown rock label: '{0}'")]
    UnknownRockLabel(String),
    #[error("unknown registry rock: '{0}'")]
    UnknownRegistryRock(String),
    #[error("unknown oxide column: '{0}'")]
    UnknownOxide(String),
    #[error("invalid sample date: '{0}' (expected Y, Y-M, or Y-M-D)")]
    InvalidSampleDate(String),
}

/// Lookup failures for callers that prefer `?` over matching on outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No alias mapping exists for the label.
    #[error("no alias mapping for '{label}'")]
    UnresolvedName { label: String },

    /// The label maps to more than one registry volcano.
    #[error("'{label}' matches {count} registry volcanoes", count = .candidates.len())]
    AmbiguousName {
        label: String,
        candidates: Vec<VolcanoId>,
    },

    /// No eruption interval contains the sample year.
    #[error("no eruption interval contains year {year}")]
    NoEruptionMatch { year: i32 },
}
