//! Versioned override tables for volcano name reconciliation.
//!
//! Registry display-name collisions, archive spelling corrections, aggregated
//! site naming exceptions, and region-qualified archive labels are kept as
//! data so they can be extended per data release without touching the
//! resolver.

pub mod embedded;
pub mod error;
pub mod overrides;

pub use error::{Result, StandardsError};
pub use overrides::{
    ArchiveOverrides, OverridePrecedence, Overrides, OverridesHeader, RegionQualifiedLabel,
    RegistryOverrides, RegistryRename, ShortNameOverride, ShorteningRules,
    load_default_overrides, load_overrides_from_path, parse_overrides,
};
