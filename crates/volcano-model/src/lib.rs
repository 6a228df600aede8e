//! Shared record types for volcano data reconciliation.
//!
//! The registry side ([`VolcanoRecord`], [`EruptionRecord`], [`EventRecord`])
//! is immutable once loaded. The archive side ([`SampleRecord`]) is enriched in
//! place by the normalization, classification, and date inference stages.
//! Outcome types ([`Resolution`], [`EruptionMatch`], [`SampleIssue`]) make every
//! recoverable failure an explicit value.

pub mod enums;
pub mod error;
pub mod ids;
pub mod outcome;
pub mod registry;
pub mod rock;
pub mod sample;
pub mod stats;

pub use enums::{EruptionCategory, Material};
pub use error::{LookupError, ModelError};
pub use ids::{EruptionNumber, VolcanoId};
pub use outcome::{EruptionMatch, Resolution};
pub use registry::{
    CalendarDate, EruptionRecord, EventRecord, PRIMARY_SHAPES, ROCK_SLOT_COUNT, VolcanoRecord,
    primary_shape_code,
};
pub use rock::{RegistryRock, RockLabel};
pub use sample::{NormalizedOxides, Oxide, OxideValues, SampleIssue, SampleRecord};
pub use stats::VolcanoStats;
