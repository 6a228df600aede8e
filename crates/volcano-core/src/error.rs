//! Errors raised by the shared context.

use std::path::PathBuf;

use thiserror::Error;
use volcano_ingest::IngestError;
use volcano_model::LookupError;
use volcano_standards::StandardsError;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Standards(#[from] StandardsError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Neither a volcano number nor a unique registry name.
    #[error("unknown volcano '{key}'")]
    UnknownVolcano { key: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("nearby index {path}: {message}")]
    NearbyIndex { path: PathBuf, message: String },
}

impl ContextError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn nearby(path: &std::path::Path, message: impl ToString) -> Self {
        Self::NearbyIndex {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ContextError>;
