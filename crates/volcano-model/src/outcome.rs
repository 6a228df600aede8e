//! Explicit outcomes for lookups that may legitimately find nothing.

use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::ids::VolcanoId;
use crate::registry::EruptionRecord;

/// Result of resolving an archive label to a registry volcano.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "volcano", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(VolcanoId),
    /// Several registry volcanoes share the target name.
    Ambiguous(Vec<VolcanoId>),
    Unresolved,
}

impl Resolution {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn volcano_id(&self) -> Option<VolcanoId> {
        match self {
            Resolution::Resolved(id) => Some(*id),
            _ => None,
        }
    }

    /// Converts to a `Result`, naming `label` in the error.
    pub fn into_result(self, label: &str) -> Result<VolcanoId, LookupError> {
        match self {
            Resolution::Resolved(id) => Ok(id),
            Resolution::Ambiguous(candidates) => Err(LookupError::AmbiguousName {
                label: label.to_string(),
                candidates,
            }),
            Resolution::Unresolved => Err(LookupError::UnresolvedName {
                label: label.to_string(),
            }),
        }
    }
}

/// Result of matching a sample year against a volcano's eruptions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EruptionMatch<'a> {
    /// An eruption ends in the sample year.
    Exact(&'a EruptionRecord),
    /// An eruption starts at or before the year and ends after it.
    Spanning(&'a EruptionRecord),
    NotFound,
}

impl<'a> EruptionMatch<'a> {
    pub fn eruption(&self) -> Option<&'a EruptionRecord> {
        match self {
            EruptionMatch::Exact(eruption) | EruptionMatch::Spanning(eruption) => Some(*eruption),
            EruptionMatch::NotFound => None,
        }
    }

    pub fn into_result(self, year: i32) -> Result<&'a EruptionRecord, LookupError> {
        self.eruption()
            .ok_or(LookupError::NoEruptionMatch { year })
    }
}
