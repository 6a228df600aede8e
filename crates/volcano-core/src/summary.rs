//! Corpus-level counts.

use std::path::Path;

use serde::Serialize;
use volcano_ingest::{list_files_with_extension, list_subdirectories};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorpusSummary {
    pub volcanoes: usize,
    /// Eruptions kept after category filtering.
    pub eruptions: usize,
    pub volcanoes_with_eruptions: usize,
    pub alias_clusters: usize,
    pub aggregated_sites: usize,
    pub archive_files: usize,
}

impl CorpusSummary {
    /// Label and value pairs in display order.
    pub fn rows(&self) -> [(&'static str, usize); 6] {
        [
            ("Volcanoes", self.volcanoes),
            ("Eruptions", self.eruptions),
            ("Volcanoes with eruptions", self.volcanoes_with_eruptions),
            ("Alias clusters", self.alias_clusters),
            ("Aggregated sites", self.aggregated_sites),
            ("Archive files", self.archive_files),
        ]
    }
}

/// Counts `.csv` files one level below the dataset directory; 0 when it is absent.
pub fn count_archive_files(dataset_dir: &Path) -> Result<usize> {
    if !dataset_dir.is_dir() {
        return Ok(0);
    }
    let mut count = 0;
    for region in list_subdirectories(dataset_dir)? {
        count += list_files_with_extension(&region, "csv")?.len();
    }
    Ok(count)
}
