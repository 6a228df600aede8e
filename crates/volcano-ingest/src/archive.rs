//! Archive chemistry files.
//!
//! Mapping entries name archive files without the download prefix that the
//! archive adds to every file, so a mapping source is first resolved to the
//! latest matching file in its region folder. Files are read with every column
//! typed as string and turned into [`SampleRecord`]s.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info_span, warn};
use volcano_model::{Material, Oxide, SampleRecord};

use crate::encoding::decode_text;
use crate::error::{IngestError, Result};
use crate::layout::{MANUAL_DATASET_REGION, list_files_with_extension};
use crate::polars_utils::{any_to_string, parse_f64, parse_month_or_day, parse_year};

/// Marker in the file name of melt inclusion compilations.
const INCLUSION_MARKER: &str = "Inclusions_comp";
/// `ROCK TYPE` kept from regular files.
const VOLCANIC_ROCK_TYPE: &str = "VOL";

/// How an archive file is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFileKind {
    /// Regular compilation; only volcanic rows are kept.
    Regular,
    /// Inclusion compilation with bracketed coordinate headers and no dates.
    Inclusion,
    /// Hand-entered dataset; columns may be missing.
    Manual,
}

impl ArchiveFileKind {
    /// Detects the kind from a `REGION/file` source path.
    pub fn detect(source: &str) -> Self {
        if source.contains(INCLUSION_MARKER) {
            ArchiveFileKind::Inclusion
        } else if source
            .split('/')
            .next()
            .is_some_and(|region| region == MANUAL_DATASET_REGION)
        {
            ArchiveFileKind::Manual
        } else {
            ArchiveFileKind::Regular
        }
    }
}

impl fmt::Display for ArchiveFileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArchiveFileKind::Regular => "regular",
            ArchiveFileKind::Inclusion => "inclusion",
            ArchiveFileKind::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// An archive file resolved on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub path: PathBuf,
    /// `REGION/file.csv` relative to the dataset directory.
    pub source: String,
    pub kind: ArchiveFileKind,
}

/// Resolves a mapping source (`REGION/name.csv`) to the file to read.
///
/// Candidates are the files of the region folder whose name contains every
/// word of `name.csv` once `-` and `_` are read as spaces. The greatest name
/// starting with a download date wins; the greatest undated match is used only
/// when no dated one exists. `ManualDataset` sources are used verbatim.
pub fn resolve_archive_path(dataset_dir: &Path, source: &str) -> Result<ArchiveFile> {
    let (region, file_name) = source.split_once('/').ok_or_else(|| {
        IngestError::InvalidValue {
            field: "archive source".to_string(),
            value: source.to_string(),
            path: dataset_dir.to_path_buf(),
        }
    })?;
    let region_dir = dataset_dir.join(region);
    let kind = ArchiveFileKind::detect(source);

    if region == MANUAL_DATASET_REGION {
        let path = region_dir.join(file_name);
        if !path.is_file() {
            return Err(IngestError::FileNotFound { path });
        }
        return Ok(ArchiveFile {
            path,
            source: source.to_string(),
            kind,
        });
    }

    let words: Vec<String> = file_name
        .replace(['-', '_'], " ")
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect();
    let (dated, undated): (Vec<String>, Vec<String>) =
        list_files_with_extension(&region_dir, "csv")?
            .iter()
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .filter(|name| words.iter().all(|word| name.contains(word.as_str())))
            .partition(|name| name.starts_with(|ch: char| ch.is_ascii_digit()));
    let Some(chosen) = dated.into_iter().max().or_else(|| undated.into_iter().max()) else {
        return Err(IngestError::ArchiveFileNotFound {
            dir: region_dir,
            source_name: file_name.to_string(),
        });
    };
    debug!(source, file = %chosen, "archive file resolved");
    Ok(ArchiveFile {
        path: region_dir.join(&chosen),
        source: format!("{region}/{chosen}"),
        kind,
    })
}

/// Reads an archive file into a string-typed DataFrame.
pub fn read_archive_frame(path: &Path) -> Result<DataFrame> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::file_read(path, e))?;
    let text = decode_text(&bytes).into_owned();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|options| options.with_truncate_ragged_lines(true))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()?;
    Ok(df)
}

/// Reads the samples of one archive file.
pub fn read_archive_samples(file: &ArchiveFile) -> Result<Vec<SampleRecord>> {
    let span = info_span!("read_archive", source = %file.source, kind = %file.kind);
    let _guard = span.enter();

    let df = read_archive_frame(&file.path)?;
    let samples = samples_from_frame(&df, file)?;
    debug!(rows = df.height(), samples = samples.len(), "archive file read");
    Ok(samples)
}

/// Column names looked up case-insensitively.
struct FrameColumns<'a> {
    df: &'a DataFrame,
    names: BTreeMap<String, PlSmallStr>,
}

impl<'a> FrameColumns<'a> {
    fn new(df: &'a DataFrame) -> Self {
        let names = df
            .get_column_names_owned()
            .into_iter()
            .map(|name| (name.trim().to_uppercase(), name))
            .collect();
        Self { df, names }
    }

    fn find(&self, candidates: &[&str]) -> Option<&'a Column> {
        candidates.iter().find_map(|candidate| {
            let name = self.names.get(&candidate.to_uppercase())?;
            self.df.column(name.as_str()).ok()
        })
    }
}

fn cell(column: Option<&Column>, idx: usize) -> String {
    column
        .map(|column| any_to_string(column.get(idx).unwrap_or(AnyValue::Null)))
        .map(|value| value.trim().to_string())
        .unwrap_or_default()
}

fn samples_from_frame(df: &DataFrame, file: &ArchiveFile) -> Result<Vec<SampleRecord>> {
    let columns = FrameColumns::new(df);
    let location = columns
        .find(&["LOCATION"])
        .ok_or_else(|| IngestError::MissingColumn {
            column: "LOCATION".to_string(),
            path: file.path.clone(),
        })?;
    let inclusion = file.kind == ArchiveFileKind::Inclusion;
    let lat_min = columns.find(&["LATITUDE MIN", "LATITUDE (MIN.)"]);
    let lat_max = columns.find(&["LATITUDE MAX", "LATITUDE (MAX.)"]);
    let lon_min = columns.find(&["LONGITUDE MIN", "LONGITUDE (MIN.)"]);
    let lon_max = columns.find(&["LONGITUDE MAX", "LONGITUDE (MAX.)"]);
    let comment = columns.find(&["LOCATION COMMENT"]);
    let sample_name = columns.find(&["SAMPLE NAME"]);
    let rock_name = columns.find(&["ROCK NAME"]);
    let material = columns.find(&["MATERIAL"]);
    let rock_type = columns.find(&["ROCK TYPE"]);
    let (tectonic, year, month, day) = if inclusion {
        (None, None, None, None)
    } else {
        (
            columns.find(&["TECTONIC SETTING"]),
            columns.find(&["ERUPTION YEAR"]),
            columns.find(&["ERUPTION MONTH"]),
            columns.find(&["ERUPTION DAY"]),
        )
    };
    let oxide_columns: Vec<(Oxide, &Column)> = Oxide::ALL
        .iter()
        .filter_map(|oxide| {
            columns
                .find(&[oxide.column_name().as_str()])
                .map(|column| (*oxide, column))
        })
        .collect();

    if file.kind == ArchiveFileKind::Regular && rock_type.is_none() {
        warn!(source = %file.source, "no ROCK TYPE column; keeping every row");
    }

    let mut samples = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        if file.kind == ArchiveFileKind::Regular
            && rock_type.is_some()
            && cell(rock_type, idx) != VOLCANIC_ROCK_TYPE
        {
            continue;
        }
        let mut raw_location = cell(Some(location), idx);
        let mut tectonic_setting = cell(tectonic, idx);
        if file.kind == ArchiveFileKind::Manual {
            raw_location = raw_location.to_uppercase();
            tectonic_setting = tectonic_setting.to_uppercase();
        }

        let mut sample = SampleRecord::new(raw_location, file.source.clone())
            .with_comment(cell(comment, idx));
        sample.latitude_min = parse_f64(&cell(lat_min, idx));
        sample.latitude_max = parse_f64(&cell(lat_max, idx));
        sample.longitude_min = parse_f64(&cell(lon_min, idx));
        sample.longitude_max = parse_f64(&cell(lon_max, idx));
        sample.sample_name = cell(sample_name, idx);
        sample.rock_name = cell(rock_name, idx);
        sample.material = if inclusion {
            Material::Inclusion
        } else {
            Material::from_archive(&cell(material, idx))
        };
        sample.tectonic_setting = tectonic_setting;
        sample.eruption_year = parse_year(&cell(year, idx));
        sample.eruption_month = parse_month_or_day(&cell(month, idx));
        sample.eruption_day = parse_month_or_day(&cell(day, idx));
        for (oxide, column) in &oxide_columns {
            let raw = cell(Some(*column), idx);
            if !raw.is_empty() {
                sample.raw_oxides.insert(*oxide, raw);
            }
        }
        samples.push(sample);
    }
    Ok(samples)
}
