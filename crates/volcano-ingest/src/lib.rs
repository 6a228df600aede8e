//! Source file loading for the registry, alias mapping files, and archive chemistry.
//!
//! Only missing or unreadable required files are errors here; row-level data
//! quality problems are logged and skipped.

pub mod archive;
pub mod encoding;
pub mod error;
pub mod layout;
pub mod mapping;
pub mod polars_utils;
pub mod registry;
pub mod table;

pub use archive::{
    ArchiveFile, ArchiveFileKind, read_archive_frame, read_archive_samples, resolve_archive_path,
};
pub use encoding::decode_text;
pub use error::{IngestError, Result};
pub use layout::{
    DATASET_DIR, DataLayout, ERUPTIONS_FILE, EVENTS_FILE, MANUAL_DATASET_REGION, MAPPING_DIR,
    VOLCANO_LIST_FILE, list_files_with_extension, list_subdirectories,
};
pub use mapping::{
    ARCHIVE_LABEL_COLUMN, MappingEntry, MappingFile, discover_mapping_files,
    load_mapping_entries, read_mapping_file,
};
pub use polars_utils::{any_to_string, format_numeric, parse_f64};
pub use registry::{
    Registry, RegistryFilter, RegistryOptions, load_eruptions, load_events, load_registry,
    load_volcanoes,
};
pub use table::{CsvTable, read_csv_table};
