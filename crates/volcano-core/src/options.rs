//! Runtime options for building a [`crate::VolcanoContext`].

use std::path::{Path, PathBuf};

use volcano_ingest::{DATASET_DIR, RegistryOptions};

/// File name of the persisted nearby-sample index.
pub const NEARBY_INDEX_FILE: &str = "GEOROCaroundGVP.csv";

#[derive(Debug, Clone)]
pub struct ContextOptions {
    pub data_dir: PathBuf,
    /// Replaces the embedded override table when set.
    pub overrides_path: Option<PathBuf>,
    pub registry: RegistryOptions,
    /// Defaults to the dataset directory.
    pub nearby_index_path: Option<PathBuf>,
}

impl ContextOptions {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            overrides_path: None,
            registry: RegistryOptions::default(),
            nearby_index_path: None,
        }
    }

    #[must_use]
    pub fn with_overrides_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.overrides_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_registry_options(mut self, registry: RegistryOptions) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_nearby_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.nearby_index_path = Some(path.into());
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn nearby_index_path(&self) -> PathBuf {
        self.nearby_index_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(DATASET_DIR).join(NEARBY_INDEX_FILE))
    }
}
