//! Per-volcano aggregates derived from the registry.
//!
//! - [`vei`]: VEI statistics and rock rank vectors ([`aggregate`])
//! - [`color`]: map marker colours from rock ranks
//! - [`events`]: eruptive event summaries and severity classes
//! - [`timeline`]: chronogram rows with filled dates and backfilled VEI

pub mod color;
pub mod events;
pub mod timeline;
pub mod vei;

pub use color::{RockColor, rock_color, stats_color};
pub use events::{
    ERUPTIVE_EVENTS, EventSummary, VolcanoEventCounts, event_counts_by_volcano, is_eruptive,
    severity_class, summarize_events,
};
pub use timeline::{
    DEFAULT_VEI, MODERN_FROM_YEAR, Timeline, TimelineRow, TimelineSpan, backfill_vei,
    build_timeline,
};
pub use vei::{VeiSummary, aggregate, rock_ranks, vei_summary};
