//! Name resolution between archive location labels and registry volcanoes.
//!
//! [`AliasIndex`] groups archive labels by the registry name they map to.
//! [`NameResolver`] pairs that index with the registry, picks short display
//! names for aggregated sites, and answers `resolve` queries with an explicit
//! [`volcano_model::Resolution`].

pub mod alias;
pub mod resolver;
pub mod short_name;

pub use alias::{AliasCluster, AliasIndex, KEY_SEPARATOR, normalize_label};
pub use resolver::{LabelSuggestion, NameResolver};
pub use short_name::{ShortName, ShortNameRule, is_aggregated, shorten, tokenize};
