//! Archive sites located near registry volcanoes.
//!
//! The index is persisted as CSV with a SHA-256 fingerprint of the archive
//! file listing in a sidecar file (`<index>.sha256`). A stored index is reused
//! while the fingerprint still matches the files on disk.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use volcano_ingest::ArchiveFile;
use volcano_model::{SampleRecord, VolcanoRecord};

use crate::error::{ContextError, Result};

/// Degrees added on every side of a site's coordinate box.
pub const NEARBY_MARGIN_DEG: f64 = 0.5;
/// Sample names listed per site before the remainder is counted.
pub const LISTED_SAMPLE_NAMES: usize = 3;

const UNNAMED_VOLCANO: &str = "Unnamed";
const SIDECAR_EXTENSION: &str = "sha256";

/// One archive site with the registry volcanoes around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbySite {
    pub location: String,
    pub latitude_min: f64,
    pub latitude_max: f64,
    pub longitude_min: f64,
    pub longitude_max: f64,
    pub source_file: String,
    /// Registry names, `; `-separated.
    pub volcanoes: String,
    /// Up to three sample names and `+N` for the rest.
    pub sample_names: String,
}

impl NearbySite {
    pub fn volcano_names(&self) -> impl Iterator<Item = &str> {
        self.volcanoes.split("; ").filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyIndex {
    pub sites: Vec<NearbySite>,
    pub fingerprint: String,
    pub generated_at: Option<DateTime<Utc>>,
    /// False when the stored index was reused.
    pub rebuilt: bool,
}

impl NearbyIndex {
    /// Sites around one registry volcano.
    pub fn sites_near<'a>(&'a self, volcano_name: &'a str) -> impl Iterator<Item = &'a NearbySite> {
        self.sites
            .iter()
            .filter(move |site| site.volcano_names().any(|name| name == volcano_name))
    }
}

/// Sample name without its `/` or `[` suffix.
pub fn sample_base_name(name: &str) -> &str {
    let name = name.split('/').next().unwrap_or(name);
    name.split('[').next().unwrap_or(name).trim()
}

/// Joins distinct sample names, listing at most [`LISTED_SAMPLE_NAMES`].
pub fn summarize_sample_names(names: &BTreeSet<String>) -> String {
    let mut parts: Vec<String> = names.iter().take(LISTED_SAMPLE_NAMES).cloned().collect();
    if names.len() > LISTED_SAMPLE_NAMES {
        parts.push(format!("+{}", names.len() - LISTED_SAMPLE_NAMES));
    }
    parts.join(" ")
}

#[derive(Debug)]
struct SiteGroup {
    location: String,
    source_file: String,
    bounds: [f64; 4],
    names: BTreeSet<String>,
}

impl SiteGroup {
    fn contains(&self, latitude: f64, longitude: f64) -> bool {
        let [lat_min, lat_max, lon_min, lon_max] = self.bounds;
        lat_min - NEARBY_MARGIN_DEG <= latitude
            && lat_max + NEARBY_MARGIN_DEG >= latitude
            && lon_min - NEARBY_MARGIN_DEG <= longitude
            && lon_max + NEARBY_MARGIN_DEG >= longitude
    }
}

fn group_sites(samples: &[SampleRecord]) -> Vec<SiteGroup> {
    let mut groups: BTreeMap<(String, String, [u64; 4]), SiteGroup> = BTreeMap::new();
    for sample in samples {
        let (Some(lat_min), Some(lat_max), Some(lon_min), Some(lon_max)) = (
            sample.latitude_min,
            sample.latitude_max,
            sample.longitude_min,
            sample.longitude_max,
        ) else {
            continue;
        };
        let bounds = [lat_min, lat_max, lon_min, lon_max];
        let key = (
            sample.location.clone(),
            sample.source_file.clone(),
            bounds.map(f64::to_bits),
        );
        let group = groups.entry(key).or_insert_with(|| SiteGroup {
            location: sample.location.clone(),
            source_file: sample.source_file.clone(),
            bounds,
            names: BTreeSet::new(),
        });
        let name = sample_base_name(&sample.sample_name);
        if !name.is_empty() {
            group.names.insert(name.to_string());
        }
    }
    groups.into_values().collect()
}

/// Builds the index from every archive row with a coordinate box.
///
/// A site is kept when at least one named registry volcano lies inside its
/// box widened by [`NEARBY_MARGIN_DEG`].
pub fn build_nearby_sites(volcanoes: &[VolcanoRecord], samples: &[SampleRecord]) -> Vec<NearbySite> {
    let located: Vec<(&str, f64, f64)> = volcanoes
        .iter()
        .filter(|volcano| volcano.name != UNNAMED_VOLCANO)
        .filter_map(|volcano| {
            let (latitude, longitude) = volcano.coordinates()?;
            Some((volcano.name.as_str(), latitude, longitude))
        })
        .collect();

    let sites: Vec<NearbySite> = group_sites(samples)
        .into_iter()
        .filter_map(|group| {
            let near: BTreeSet<&str> = located
                .iter()
                .filter(|(_, latitude, longitude)| group.contains(*latitude, *longitude))
                .map(|(name, _, _)| *name)
                .collect();
            if near.is_empty() {
                return None;
            }
            let [latitude_min, latitude_max, longitude_min, longitude_max] = group.bounds;
            Some(NearbySite {
                sample_names: summarize_sample_names(&group.names),
                location: group.location,
                latitude_min,
                latitude_max,
                longitude_min,
                longitude_max,
                source_file: group.source_file,
                volcanoes: near.into_iter().collect::<Vec<_>>().join("; "),
            })
        })
        .collect();
    debug!(volcanoes = located.len(), sites = sites.len(), "nearby sites built");
    sites
}

/// SHA-256 over the archive file listing (source names and sizes).
pub fn archive_fingerprint(files: &[ArchiveFile]) -> Result<String> {
    let mut listing: Vec<(String, u64)> = Vec::with_capacity(files.len());
    for file in files {
        let metadata = fs::metadata(&file.path).map_err(|e| ContextError::io(&file.path, e))?;
        listing.push((file.source.clone(), metadata.len()));
    }
    listing.sort();

    let mut hasher = Sha256::new();
    for (source, size) in &listing {
        hasher.update(format!("{source}\t{size}\n").as_bytes());
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Path of the fingerprint file stored next to an index.
pub fn sidecar_path(index_path: &Path) -> PathBuf {
    let mut name = index_path.as_os_str().to_owned();
    name.push(".");
    name.push(SIDECAR_EXTENSION);
    PathBuf::from(name)
}

/// Reads the stored fingerprint and build time, if the sidecar exists.
pub fn read_fingerprint(index_path: &Path) -> Option<(String, Option<DateTime<Utc>>)> {
    let content = fs::read_to_string(sidecar_path(index_path)).ok()?;
    let mut tokens = content.split_whitespace();
    let fingerprint = tokens.next()?.to_lowercase();
    let generated_at = tokens
        .next()
        .and_then(|stamp| DateTime::parse_from_rfc3339(stamp).ok())
        .map(|stamp| stamp.with_timezone(&Utc));
    Some((fingerprint, generated_at))
}

/// Whether the stored index exists and matches `fingerprint`.
pub fn is_fresh(index_path: &Path, fingerprint: &str) -> bool {
    index_path.is_file()
        && read_fingerprint(index_path).is_some_and(|(stored, _)| stored == fingerprint)
}

pub fn write_nearby_index(path: &Path, index: &NearbyIndex) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| ContextError::io(parent, e))?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(|e| ContextError::nearby(path, e))?;
    for site in &index.sites {
        writer
            .serialize(site)
            .map_err(|e| ContextError::nearby(path, e))?;
    }
    writer.flush().map_err(|e| ContextError::io(path, e))?;

    let generated_at = index.generated_at.unwrap_or_else(Utc::now);
    let sidecar = sidecar_path(path);
    fs::write(
        &sidecar,
        format!("{}  {}\n", index.fingerprint, generated_at.to_rfc3339()),
    )
    .map_err(|e| ContextError::io(&sidecar, e))?;
    info!(path = %path.display(), sites = index.sites.len(), "nearby index written");
    Ok(())
}

pub fn read_nearby_sites(path: &Path) -> Result<Vec<NearbySite>> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| ContextError::nearby(path, e))?;
    reader
        .deserialize()
        .map(|row| row.map_err(|e| ContextError::nearby(path, e)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use volcano_ingest::ArchiveFileKind;
    use volcano_model::VolcanoId;

    fn site_sample(name: &str, lat: f64, lon: f64) -> SampleRecord {
        let mut sample = SampleRecord::new("KERMADEC ARC / RAOUL ISLAND", "KERMADEC_ARC/K.csv");
        sample.sample_name = name.to_string();
        sample.latitude_min = Some(lat);
        sample.latitude_max = Some(lat);
        sample.longitude_min = Some(lon);
        sample.longitude_max = Some(lon);
        sample
    }

    fn volcano(id: u32, name: &str, lat: f64, lon: f64) -> VolcanoRecord {
        let mut volcano = VolcanoRecord::new(VolcanoId::new(id), name);
        volcano.latitude = Some(lat);
        volcano.longitude = Some(lon);
        volcano
    }

    #[test]
    fn test_sample_names() {
        assert_eq!(sample_base_name("RI-12/2 [1234]"), "RI-12");
        assert_eq!(sample_base_name("RI-13 [88]"), "RI-13");
        let names: BTreeSet<String> = ["A", "B", "C", "D", "E"].map(String::from).into();
        assert_eq!(summarize_sample_names(&names), "A B C +2");
        let names: BTreeSet<String> = ["A", "B"].map(String::from).into();
        assert_eq!(summarize_sample_names(&names), "A B");
    }

    #[test]
    fn test_build_nearby_sites() {
        let volcanoes = vec![
            volcano(1, "Raoul Island", -29.27, -177.92),
            volcano(2, "Unnamed", -29.3, -177.9),
            volcano(3, "Macauley Island", -30.2, -178.47),
        ];
        let samples = vec![
            site_sample("RI-1/1 [10]", -29.2, -177.9),
            site_sample("RI-1/2 [11]", -29.2, -177.9),
            site_sample("RI-2", -29.2, -177.9),
            site_sample("FAR", 10.0, 10.0),
        ];
        let sites = build_nearby_sites(&volcanoes, &samples);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].volcanoes, "Raoul Island");
        assert_eq!(sites[0].sample_names, "RI-1 RI-2");
    }

    #[test]
    fn test_index_roundtrip_and_freshness() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("K.csv");
        fs::write(&archive, "LOCATION\nX\n").unwrap();
        let files = vec![ArchiveFile {
            path: archive.clone(),
            source: "KERMADEC_ARC/K.csv".to_string(),
            kind: ArchiveFileKind::Regular,
        }];
        let fingerprint = archive_fingerprint(&files).unwrap();
        assert_eq!(fingerprint.len(), 64);

        let index_path = temp.path().join("out/nearby.csv");
        assert!(!is_fresh(&index_path, &fingerprint));

        let sites = build_nearby_sites(
            &[volcano(1, "Raoul Island", -29.27, -177.92)],
            &[site_sample("RI-1", -29.2, -177.9)],
        );
        let index = NearbyIndex {
            sites: sites.clone(),
            fingerprint: fingerprint.clone(),
            generated_at: None,
            rebuilt: true,
        };
        write_nearby_index(&index_path, &index).unwrap();
        assert!(is_fresh(&index_path, &fingerprint));
        assert_eq!(read_nearby_sites(&index_path).unwrap(), sites);
        assert!(read_fingerprint(&index_path).unwrap().1.is_some());

        fs::write(&archive, "LOCATION\nX\nY\n").unwrap();
        let changed = archive_fingerprint(&files).unwrap();
        assert_ne!(changed, fingerprint);
        assert!(!is_fresh(&index_path, &changed));
    }
}
