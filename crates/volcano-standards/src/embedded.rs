//! Embedded override data.
//!
//! The default override table is embedded at compile time with `include_str!()`
//! so the library works without any files next to the binary. An external file
//! with the same schema can replace it at runtime.

/// Default override table (`data/overrides.toml`).
pub const DEFAULT_OVERRIDES: &str = include_str!("../data/overrides.toml");

/// Origin label used in errors for the embedded table.
pub const DEFAULT_OVERRIDES_ORIGIN: &str = "<embedded overrides.toml>";
