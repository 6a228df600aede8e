//! Shared context for volcano data reconciliation.
//!
//! [`VolcanoContext`] is built once from a data directory and answers every
//! query: name resolution, per-volcano statistics and timelines, enriched
//! archive samples per alias cluster, and the nearby-sample index.

pub mod context;
pub mod error;
pub mod location;
pub mod nearby;
pub mod options;
pub mod summary;

pub use context::VolcanoContext;
pub use error::{ContextError, Result};
pub use location::{location_matches, select_cluster_samples};
pub use nearby::{
    LISTED_SAMPLE_NAMES, NEARBY_MARGIN_DEG, NearbyIndex, NearbySite, archive_fingerprint,
    build_nearby_sites, read_nearby_sites, sidecar_path, write_nearby_index,
};
pub use options::{ContextOptions, NEARBY_INDEX_FILE};
pub use summary::CorpusSummary;
