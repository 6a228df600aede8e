//! Alias mapping files pairing archive location labels with registry names.
//!
//! Each region folder under the mapping directory holds `;`-delimited text
//! files. The `GEOROC` column carries the archive label and the first column
//! the registry name. A mapping file `REGION/name.txt` describes the archive
//! data file `REGION/name.csv`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::error::Result;
use crate::layout::{DataLayout, list_files_with_extension, list_subdirectories};
use crate::table::{CsvTable, read_csv_table};

/// Column holding the archive label.
pub const ARCHIVE_LABEL_COLUMN: &str = "GEOROC";

/// A non-empty mapping file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingFile {
    pub region: String,
    pub stem: String,
    pub path: PathBuf,
}

impl MappingFile {
    /// `REGION/stem.csv`, the archive data source this file describes.
    pub fn source(&self) -> String {
        format!("{}/{}.csv", self.region, self.stem)
    }
}

/// One archive label paired with its registry name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub archive_label: String,
    pub registry_name: String,
    /// `REGION/file.csv` the entry came from.
    pub source: String,
}

impl MappingEntry {
    pub fn new(
        archive_label: impl Into<String>,
        registry_name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            archive_label: archive_label.into(),
            registry_name: registry_name.into(),
            source: source.into(),
        }
    }
}

/// Lists non-empty mapping files, regions and files in name order.
pub fn discover_mapping_files(dir: &Path) -> Result<Vec<MappingFile>> {
    let mut files = Vec::new();
    for region_dir in list_subdirectories(dir)? {
        let Some(region) = file_name_string(&region_dir) else {
            continue;
        };
        for path in list_files_with_extension(&region_dir, "txt")? {
            let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
            if size == 0 {
                debug!(path = %path.display(), "skipping empty mapping file");
                continue;
            }
            let Some(stem) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
            else {
                continue;
            };
            files.push(MappingFile {
                region: region.clone(),
                stem,
                path,
            });
        }
    }
    Ok(files)
}

/// Reads the entries of one mapping file in row order.
///
/// A label listed twice in one file keeps the registry name of its first row.
pub fn read_mapping_file(file: &MappingFile) -> Result<Vec<MappingEntry>> {
    let table = read_csv_table(&file.path, b';', ARCHIVE_LABEL_COLUMN)?;
    let label_col = table.require_column(ARCHIVE_LABEL_COLUMN, &file.path)?;
    let source = file.source();

    let mut first_target: BTreeMap<&str, &str> = BTreeMap::new();
    for row in &table.rows {
        let label = CsvTable::cell(row, label_col);
        if !label.is_empty() {
            first_target
                .entry(label)
                .or_insert_with(|| CsvTable::cell(row, 0));
        }
    }

    let mut entries = Vec::with_capacity(table.len());
    for row in &table.rows {
        let label = CsvTable::cell(row, label_col);
        let Some(target) = first_target.get(label) else {
            continue;
        };
        if target.is_empty() {
            debug!(label, source = %source, "mapping row without registry name");
            continue;
        }
        entries.push(MappingEntry::new(label, *target, source.clone()));
    }
    Ok(entries)
}

/// Reads every mapping file under the data directory.
pub fn load_mapping_entries(layout: &DataLayout) -> Result<Vec<MappingEntry>> {
    let dir = layout.mapping_dir();
    let span = info_span!("load_mapping", path = %dir.display());
    let _guard = span.enter();

    let files = discover_mapping_files(&dir)?;
    let mut entries = Vec::new();
    for file in &files {
        let file_entries = read_mapping_file(file)?;
        debug!(source = %file.source(), entries = file_entries.len(), "mapping file read");
        entries.extend(file_entries);
    }
    info!(files = files.len(), entries = entries.len(), "mapping files loaded");
    Ok(entries)
}

fn file_name_string(path: &Path) -> Option<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_discover_and_read() {
        let temp = TempDir::new().unwrap();
        let mapping = temp.path().join("GeorocGVPmapping");
        fs::create_dir_all(mapping.join("Kermadec_Arc")).unwrap();
        fs::create_dir_all(mapping.join("Aegean_Arc")).unwrap();
        fs::write(
            mapping.join("Kermadec_Arc/KERMADEC_ARC.txt"),
            "GVP;GEOROC\nRaoul Island;RAOUL ISLAND\nRaoul Island;RAOUL\nMacauley Island;MACAULEY ISLAND\n",
        )
        .unwrap();
        fs::write(mapping.join("Kermadec_Arc/EMPTY.txt"), "").unwrap();
        fs::write(
            mapping.join("Aegean_Arc/AEGEAN_ARC.txt"),
            "GVP;GEOROC\nSantorini;SANTORINI\n",
        )
        .unwrap();

        let files = discover_mapping_files(&mapping).unwrap();
        let sources: Vec<_> = files.iter().map(MappingFile::source).collect();
        assert_eq!(
            sources,
            vec!["Aegean_Arc/AEGEAN_ARC.csv", "Kermadec_Arc/KERMADEC_ARC.csv"]
        );

        let entries = load_mapping_entries(&DataLayout::new(temp.path())).unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(
            entries[2],
            MappingEntry::new("RAOUL", "Raoul Island", "Kermadec_Arc/KERMADEC_ARC.csv")
        );
    }

    #[test]
    fn test_repeated_label_keeps_first_target() {
        let temp = TempDir::new().unwrap();
        let region = temp.path().join("R");
        fs::create_dir_all(&region).unwrap();
        let path = region.join("F.txt");
        fs::write(&path, "GVP;GEOROC\nA;X\nB;X\n").unwrap();
        let file = MappingFile {
            region: "R".to_string(),
            stem: "F".to_string(),
            path,
        };
        let entries = read_mapping_file(&file).unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|entry| entry.registry_name == "A"));
    }
}
