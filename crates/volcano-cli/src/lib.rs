//! Library surface of the `volcano` command-line tool.

pub mod logging;
pub mod summary;
