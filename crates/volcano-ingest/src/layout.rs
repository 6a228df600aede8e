//! Data directory layout and file discovery.

use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

pub const VOLCANO_LIST_FILE: &str = "GVP_Volcano_List.csv";
pub const ERUPTIONS_FILE: &str = "GVP_Eruption_Results.csv";
pub const EVENTS_FILE: &str = "GVP_Events.csv";
pub const MAPPING_DIR: &str = "GeorocGVPmapping";
pub const DATASET_DIR: &str = "GeorocDataset";
/// Region folder whose files are named exactly by their mapping entries.
pub const MANUAL_DATASET_REGION: &str = "ManualDataset";

/// Paths of every input under one data directory.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn volcano_list(&self) -> PathBuf {
        self.root.join(VOLCANO_LIST_FILE)
    }

    pub fn eruptions(&self) -> PathBuf {
        self.root.join(ERUPTIONS_FILE)
    }

    pub fn events(&self) -> PathBuf {
        self.root.join(EVENTS_FILE)
    }

    pub fn mapping_dir(&self) -> PathBuf {
        self.root.join(MAPPING_DIR)
    }

    pub fn dataset_dir(&self) -> PathBuf {
        self.root.join(DATASET_DIR)
    }

    /// Fails unless the data directory exists.
    pub fn ensure_exists(&self) -> Result<()> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(IngestError::DirectoryNotFound {
                path: self.root.clone(),
            })
        }
    }
}

/// Lists files with the given extension (case-insensitive), sorted by name.
pub fn list_files_with_extension(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = read_dir_entries(dir)?
        .into_iter()
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        })
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Lists subdirectories, sorted by name.
pub fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs: Vec<PathBuf> = read_dir_entries(dir)?
        .into_iter()
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(dirs)
}

fn read_dir_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        paths.push(entry.path());
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_layout_paths() {
        let layout = DataLayout::new("/data");
        assert_eq!(layout.eruptions(), PathBuf::from("/data/GVP_Eruption_Results.csv"));
        assert_eq!(layout.mapping_dir(), PathBuf::from("/data/GeorocGVPmapping"));
    }

    #[test]
    fn test_list_files_with_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "x").unwrap();
        fs::write(temp.path().join("a.TXT"), "x").unwrap();
        fs::write(temp.path().join("c.csv"), "x").unwrap();
        fs::create_dir(temp.path().join("d.txt")).unwrap();

        let files = list_files_with_extension(temp.path(), "txt").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.TXT", "b.txt"]);
    }

    #[test]
    fn test_missing_directory() {
        let result = list_subdirectories(Path::new("/nonexistent/volcano/data"));
        assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
    }
}
