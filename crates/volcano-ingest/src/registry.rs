//! Registry loading: volcano list, eruptions, and eruption events.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::{debug, info, info_span, warn};
use volcano_model::{
    EruptionCategory, EruptionNumber, EruptionRecord, EventRecord, ROCK_SLOT_COUNT, RegistryRock,
    VolcanoId, VolcanoRecord,
};
use volcano_standards::RegistryOverrides;

use crate::error::{IngestError, Result};
use crate::layout::DataLayout;
use crate::polars_utils::{parse_f64, parse_month_or_day, parse_year};
use crate::table::{CsvTable, read_csv_table};

const VOLCANO_NUMBER: &str = "Volcano Number";
const VOLCANO_NAME: &str = "Volcano Name";
const ERUPTION_NUMBER: &str = "Eruption Number";

/// Volcano names whose eruption rows are dropped.
const DROPPED_NAMES: [&str; 2] = ["Unknown Source", "Unnamed"];

const ROCK_COLUMNS: [&str; ROCK_SLOT_COUNT] = [
    "Major Rock 1",
    "Major Rock 2",
    "Major Rock 3",
    "Major Rock 4",
    "Major Rock 5",
    "Minor Rock 1",
    "Minor Rock 2",
    "Minor Rock 3",
    "Minor Rock 4",
    "Minor Rock 5",
];

/// Options for registry loading.
#[derive(Debug, Clone)]
pub struct RegistryOptions {
    /// Keep only confirmed eruptions.
    pub confirmed_only: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            confirmed_only: true,
        }
    }
}

impl RegistryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_confirmed_only(mut self, confirmed_only: bool) -> Self {
        self.confirmed_only = confirmed_only;
        self
    }
}

/// Volcano selection by country and tectonic setting.
#[derive(Debug, Clone, Default)]
pub struct RegistryFilter {
    /// `None` (or `all`) keeps every country.
    pub country: Option<String>,
    /// Empty keeps every setting.
    pub tectonic_settings: Vec<String>,
    /// Keep only volcanoes with at least one kept eruption.
    pub with_eruptions_only: bool,
}

impl RegistryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        let country = country.into();
        self.country = if country.trim().eq_ignore_ascii_case("all") {
            None
        } else {
            Some(country.trim().to_string())
        };
        self
    }

    #[must_use]
    pub fn with_tectonic_setting(mut self, setting: impl Into<String>) -> Self {
        let setting = setting.into();
        if !setting.trim().is_empty() {
            self.tectonic_settings.push(setting.trim().to_string());
        }
        self
    }

    #[must_use]
    pub fn with_eruptions_only(mut self, with_eruptions_only: bool) -> Self {
        self.with_eruptions_only = with_eruptions_only;
        self
    }
}

/// The loaded registry, immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    volcanoes: Vec<VolcanoRecord>,
    by_id: BTreeMap<VolcanoId, usize>,
    eruptions: Vec<EruptionRecord>,
    events: Vec<EventRecord>,
}

impl Registry {
    /// Builds a registry from already-parsed records.
    pub fn from_records(
        volcanoes: Vec<VolcanoRecord>,
        eruptions: Vec<EruptionRecord>,
        events: Vec<EventRecord>,
    ) -> Self {
        let by_id = volcanoes
            .iter()
            .enumerate()
            .map(|(index, volcano)| (volcano.id, index))
            .collect();
        Self {
            volcanoes,
            by_id,
            eruptions,
            events,
        }
    }

    pub fn volcanoes(&self) -> &[VolcanoRecord] {
        &self.volcanoes
    }

    pub fn eruptions(&self) -> &[EruptionRecord] {
        &self.eruptions
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn volcano(&self, id: VolcanoId) -> Option<&VolcanoRecord> {
        self.by_id.get(&id).map(|index| &self.volcanoes[*index])
    }

    /// Volcanoes whose display name equals `name` (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Vec<&VolcanoRecord> {
        let wanted = name.trim();
        self.volcanoes
            .iter()
            .filter(|volcano| volcano.name.eq_ignore_ascii_case(wanted))
            .collect()
    }

    /// Looks a volcano up by number or display name; ambiguous names yield `None`.
    pub fn lookup(&self, key: &str) -> Option<&VolcanoRecord> {
        if let Ok(id) = key.trim().parse::<VolcanoId>()
            && let Some(volcano) = self.volcano(id)
        {
            return Some(volcano);
        }
        match self.find_by_name(key).as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// Eruptions of one volcano in registry order.
    pub fn eruptions_for(&self, id: VolcanoId) -> Vec<&EruptionRecord> {
        self.eruptions
            .iter()
            .filter(|eruption| eruption.volcano_id == id)
            .collect()
    }

    /// Events of one eruption in registry order.
    pub fn events_for_eruption(&self, number: EruptionNumber) -> Vec<&EventRecord> {
        self.events
            .iter()
            .filter(|event| event.eruption_number == number)
            .collect()
    }

    /// Events of every eruption of one volcano.
    pub fn events_for(&self, id: VolcanoId) -> Vec<&EventRecord> {
        self.events
            .iter()
            .filter(|event| event.volcano_id == id)
            .collect()
    }

    /// Volcanoes with at least one kept eruption.
    pub fn volcanoes_with_eruptions(&self) -> BTreeSet<VolcanoId> {
        self.eruptions.iter().map(|e| e.volcano_id).collect()
    }

    /// Sorted distinct countries.
    pub fn countries(&self) -> Vec<&str> {
        let countries: BTreeSet<&str> = self
            .volcanoes
            .iter()
            .map(|volcano| volcano.country.as_str())
            .filter(|country| !country.is_empty())
            .collect();
        countries.into_iter().collect()
    }

    /// Sorted distinct tectonic settings.
    pub fn tectonic_settings(&self) -> Vec<&str> {
        let settings: BTreeSet<&str> = self
            .volcanoes
            .iter()
            .map(|volcano| volcano.tectonic_setting.as_str())
            .filter(|setting| !setting.is_empty())
            .collect();
        settings.into_iter().collect()
    }

    /// Volcanoes matching a filter, in registry order.
    pub fn filter(&self, filter: &RegistryFilter) -> Vec<&VolcanoRecord> {
        let erupting = if filter.with_eruptions_only {
            Some(self.volcanoes_with_eruptions())
        } else {
            None
        };
        self.volcanoes
            .iter()
            .filter(|volcano| {
                filter
                    .country
                    .as_deref()
                    .is_none_or(|country| volcano.country == country)
            })
            .filter(|volcano| {
                filter.tectonic_settings.is_empty()
                    || filter
                        .tectonic_settings
                        .iter()
                        .any(|setting| volcano.tectonic_setting == *setting)
            })
            .filter(|volcano| {
                erupting
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&volcano.id))
            })
            .collect()
    }
}

/// Loads the three registry tables from a data directory.
pub fn load_registry(
    layout: &DataLayout,
    overrides: &RegistryOverrides,
    options: &RegistryOptions,
) -> Result<Registry> {
    let volcanoes = load_volcanoes(&layout.volcano_list(), overrides)?;
    let names: BTreeMap<VolcanoId, &str> = volcanoes
        .iter()
        .map(|volcano| (volcano.id, volcano.name.as_str()))
        .collect();

    let mut eruptions = load_eruptions(&layout.eruptions(), options)?;
    for eruption in &mut eruptions {
        align_name(&mut eruption.volcano_name, eruption.volcano_id, &names, overrides);
    }
    let mut events = load_events(&layout.events())?;
    for event in &mut events {
        align_name(&mut event.volcano_name, event.volcano_id, &names, overrides);
    }

    let registry = Registry::from_records(volcanoes, eruptions, events);
    info!(
        volcanoes = registry.volcanoes().len(),
        eruptions = registry.eruptions().len(),
        events = registry.events().len(),
        "registry loaded"
    );
    Ok(registry)
}

/// Gives eruption and event rows the volcano list spelling of their name.
fn align_name(
    name: &mut String,
    id: VolcanoId,
    names: &BTreeMap<VolcanoId, &str>,
    overrides: &RegistryOverrides,
) {
    if let Some(listed) = names.get(&id) {
        if name.as_str() != *listed {
            debug!(volcano = %id, from = %name, to = %listed, "aligning volcano name");
            *name = (*listed).to_string();
        }
    } else if let Some(renamed) = overrides.rename_for(id.get()) {
        *name = renamed.to_string();
    }
}

/// Loads the registry volcano list.
///
/// Volcano numbers listed for disambiguation get `-<Subregion>` appended to
/// their name; corrected spellings replace the listed name.
pub fn load_volcanoes(path: &Path, overrides: &RegistryOverrides) -> Result<Vec<VolcanoRecord>> {
    let span = info_span!("load_volcanoes", path = %path.display());
    let _guard = span.enter();

    let table = read_csv_table(path, b',', VOLCANO_NUMBER)?;
    let id_col = table.require_column(VOLCANO_NUMBER, path)?;
    let name_col = table.require_column(VOLCANO_NAME, path)?;
    let country_col = table.column("Country");
    let subregion_col = table.column("Subregion");
    let lat_col = table.column("Latitude");
    let lon_col = table.column("Longitude");
    let tectonic_col = table.column("Tectonic Settings");
    let primary_col = table.column("Primary Volcano Type");
    let rock_cols: Vec<Option<usize>> = ROCK_COLUMNS.iter().map(|c| table.column(c)).collect();

    let mut volcanoes = Vec::with_capacity(table.len());
    for row in &table.rows {
        let id = parse_volcano_id(CsvTable::cell(row, id_col), path)?;
        let mut volcano = VolcanoRecord::new(id, CsvTable::cell(row, name_col));
        volcano.country = CsvTable::optional_cell(row, country_col).to_string();
        volcano.subregion = CsvTable::optional_cell(row, subregion_col).to_string();
        volcano.latitude = parse_f64(CsvTable::optional_cell(row, lat_col));
        volcano.longitude = parse_f64(CsvTable::optional_cell(row, lon_col));
        volcano.tectonic_setting = CsvTable::optional_cell(row, tectonic_col).to_string();
        volcano.primary_type = CsvTable::optional_cell(row, primary_col).to_string();
        for (slot, column) in rock_cols.iter().enumerate() {
            let raw = CsvTable::optional_cell(row, *column);
            volcano.rock_slots[slot] = match RegistryRock::from_slot(raw) {
                Ok(rock) => rock,
                Err(err) => {
                    debug!(volcano = %id, slot = slot + 1, error = %err, "ignoring rock slot");
                    None
                }
            };
        }
        if let Some(renamed) = overrides.rename_for(id.get()) {
            volcano.name = renamed.to_string();
        }
        if overrides.needs_disambiguation(id.get()) {
            volcano.name = format!("{}-{}", volcano.name, volcano.subregion);
        }
        volcanoes.push(volcano);
    }

    let mut seen = BTreeSet::new();
    for volcano in &volcanoes {
        if !seen.insert(volcano.name.to_uppercase()) {
            warn!(volcano = %volcano.id, name = %volcano.name, "duplicate volcano display name");
        }
    }
    debug!(count = volcanoes.len(), "volcano list parsed");
    Ok(volcanoes)
}

/// Loads the registry eruption list.
pub fn load_eruptions(path: &Path, options: &RegistryOptions) -> Result<Vec<EruptionRecord>> {
    let span = info_span!("load_eruptions", path = %path.display());
    let _guard = span.enter();

    let table = read_csv_table(path, b',', ERUPTION_NUMBER)?;
    let id_col = table.require_column(VOLCANO_NUMBER, path)?;
    let name_col = table.require_column(VOLCANO_NAME, path)?;
    let number_col = table.require_column(ERUPTION_NUMBER, path)?;
    let category_col = table.column("Eruption Category");
    let vei_col = table.column("VEI");
    let start_year_col = table.column("Start Year");
    let start_month_col = table.column("Start Month");
    let start_day_col = table.column("Start Day");
    let end_year_col = table.column("End Year");
    let end_month_col = table.column("End Month");
    let end_day_col = table.column("End Day");

    let mut eruptions = Vec::with_capacity(table.len());
    let mut dropped = 0usize;
    for row in &table.rows {
        let name = CsvTable::cell(row, name_col);
        if DROPPED_NAMES.iter().any(|dropped| name == *dropped) {
            dropped += 1;
            continue;
        }
        let category = EruptionCategory::from_registry(CsvTable::optional_cell(row, category_col));
        if options.confirmed_only && category != EruptionCategory::Confirmed {
            dropped += 1;
            continue;
        }
        let number = CsvTable::cell(row, number_col);
        let number: EruptionNumber =
            number
                .parse()
                .map_err(|_| IngestError::InvalidValue {
                    field: ERUPTION_NUMBER.to_string(),
                    value: number.to_string(),
                    path: path.to_path_buf(),
                })?;
        let id = parse_volcano_id(CsvTable::cell(row, id_col), path)?;

        let mut eruption = EruptionRecord::new(number, id);
        eruption.volcano_name = name.to_string();
        eruption.category = category;
        eruption.vei = parse_vei(CsvTable::optional_cell(row, vei_col));
        eruption.start_year = parse_year(CsvTable::optional_cell(row, start_year_col));
        eruption.start_month = parse_month_or_day(CsvTable::optional_cell(row, start_month_col));
        eruption.start_day = parse_month_or_day(CsvTable::optional_cell(row, start_day_col));
        eruption.end_year = parse_year(CsvTable::optional_cell(row, end_year_col));
        eruption.end_month = parse_month_or_day(CsvTable::optional_cell(row, end_month_col));
        eruption.end_day = parse_month_or_day(CsvTable::optional_cell(row, end_day_col));
        eruptions.push(eruption);
    }
    debug!(kept = eruptions.len(), dropped, "eruption list parsed");
    Ok(eruptions)
}

/// Loads the registry eruption event table.
pub fn load_events(path: &Path) -> Result<Vec<EventRecord>> {
    let span = info_span!("load_events", path = %path.display());
    let _guard = span.enter();

    let table = read_csv_table(path, b',', "Event Type")?;
    let id_col = table.require_column(VOLCANO_NUMBER, path)?;
    let name_col = table.column(VOLCANO_NAME);
    let number_col = table.require_column(ERUPTION_NUMBER, path)?;
    let type_col = table.require_column("Event Type", path)?;

    let mut events = Vec::with_capacity(table.len());
    for row in &table.rows {
        let number = CsvTable::cell(row, number_col);
        let Ok(eruption_number) = number.parse::<EruptionNumber>() else {
            debug!(value = number, "skipping event without eruption number");
            continue;
        };
        let Ok(volcano_id) = CsvTable::cell(row, id_col).parse::<VolcanoId>() else {
            debug!(eruption = %eruption_number, "skipping event without volcano number");
            continue;
        };
        events.push(EventRecord {
            eruption_number,
            volcano_id,
            volcano_name: CsvTable::optional_cell(row, name_col).to_string(),
            event_type: CsvTable::cell(row, type_col).to_string(),
        });
    }
    debug!(count = events.len(), "event table parsed");
    Ok(events)
}

fn parse_volcano_id(raw: &str, path: &Path) -> Result<VolcanoId> {
    raw.parse().map_err(|_| IngestError::InvalidValue {
        field: VOLCANO_NUMBER.to_string(),
        value: raw.to_string(),
        path: path.to_path_buf(),
    })
}

/// VEI 0-8; anything else counts as unknown.
fn parse_vei(raw: &str) -> Option<u8> {
    crate::polars_utils::parse_whole(raw)
        .and_then(|v| u8::try_from(v).ok())
        .filter(|v| *v <= 8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use volcano_standards::load_default_overrides;

    fn write_registry(dir: &Path) {
        fs::write(
            dir.join("GVP_Volcano_List.csv"),
            "Volcano List,,,,,,,,,\n\
             Volcano Number,Volcano Name,Country,Subregion,Latitude,Longitude,Tectonic Settings,Primary Volcano Type,Major Rock 1,Major Rock 2\n\
             353060,Azufral,Colombia,Colombia,1.08,-77.68,Subduction zone,Stratovolcano,Andesite / Basaltic Andesite,Dacite\n\
             211060,Etna,Italy,Italy,37.748,14.999,Subduction zone,Stratovolcano(es),Basalt / Picro-Basalt,No Data (checked)\n\
             371030,Krysuvik-Trolladyngja,Iceland,Iceland (southern),63.93,-22.1,Rift zone,Fissure vent(s),Basalt / Picro-Basalt,\n",
        )
        .unwrap();
        fs::write(
            dir.join("GVP_Eruption_Results.csv"),
            "Volcano Number,Volcano Name,Eruption Number,Eruption Category,VEI,Start Year,Start Month,Start Day,End Year,End Month,End Day\n\
             211060,Etna,10001,Confirmed Eruption,2,2021,2,0,,,\n\
             211060,Etna,10002,Uncertain Eruption,,1990,,,,,\n\
             371030,Krysuvik-Trolladyngja,10003,Confirmed Eruption,,1340,,,,,\n\
             600000,Unknown Source,10004,Confirmed Eruption,6,1465,,,,,\n",
        )
        .unwrap();
        fs::write(
            dir.join("GVP_Events.csv"),
            "Volcano Number,Volcano Name,Eruption Number,Event Type\n\
             211060,Etna,10001,Lava fountains\n\
             211060,Etna,10001,Explosion\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_registry() {
        let temp = TempDir::new().unwrap();
        write_registry(temp.path());
        let overrides = load_default_overrides().unwrap();
        let registry = load_registry(
            &DataLayout::new(temp.path()),
            &overrides.registry,
            &RegistryOptions::default(),
        )
        .unwrap();

        assert_eq!(registry.volcanoes().len(), 3);
        let azufral = registry.volcano(VolcanoId::new(353060)).unwrap();
        assert_eq!(azufral.name, "Azufral-Colombia");
        assert_eq!(
            azufral.rock_slots[..2],
            [
                Some(RegistryRock::AndesiteBasalticAndesite),
                Some(RegistryRock::Dacite)
            ]
        );
        let etna = registry.lookup("etna").unwrap();
        assert_eq!(etna.rock_slots[1], None);
        assert_eq!(etna.coordinates(), Some((37.748, 14.999)));

        // Uncertain and Unknown Source rows are dropped.
        assert_eq!(registry.eruptions().len(), 2);
        let etna_eruptions = registry.eruptions_for(etna.id);
        assert_eq!(etna_eruptions.len(), 1);
        assert_eq!(etna_eruptions[0].vei, Some(2));
        assert_eq!(etna_eruptions[0].start_day, None);

        let renamed = registry.eruptions_for(VolcanoId::new(371030));
        assert_eq!(renamed[0].volcano_name, "Krysuvik");
        assert_eq!(registry.lookup("371030").unwrap().name, "Krysuvik");

        assert_eq!(
            registry
                .events_for_eruption(EruptionNumber::new(10001))
                .len(),
            2
        );
    }

    #[test]
    fn test_keep_all_categories() {
        let temp = TempDir::new().unwrap();
        write_registry(temp.path());
        let eruptions = load_eruptions(
            &temp.path().join("GVP_Eruption_Results.csv"),
            &RegistryOptions::new().with_confirmed_only(false),
        )
        .unwrap();
        assert_eq!(eruptions.len(), 3);
        assert_eq!(eruptions[1].category, EruptionCategory::Uncertain);
    }

    #[test]
    fn test_filter() {
        let temp = TempDir::new().unwrap();
        write_registry(temp.path());
        let overrides = load_default_overrides().unwrap();
        let registry = load_registry(
            &DataLayout::new(temp.path()),
            &overrides.registry,
            &RegistryOptions::default(),
        )
        .unwrap();

        let all = registry.filter(&RegistryFilter::new().with_country("all"));
        assert_eq!(all.len(), 3);
        let subduction = registry.filter(
            &RegistryFilter::new()
                .with_country("all")
                .with_tectonic_setting("Subduction zone"),
        );
        assert_eq!(subduction.len(), 2);
        let erupting = registry.filter(&RegistryFilter::new().with_eruptions_only(true));
        let names: Vec<_> = erupting.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Etna", "Krysuvik"]);
        assert_eq!(registry.countries(), vec!["Colombia", "Iceland", "Italy"]);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let result = load_volcanoes(
            &temp.path().join("GVP_Volcano_List.csv"),
            &RegistryOverrides::default(),
        );
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }

    #[test]
    fn test_parse_vei() {
        assert_eq!(parse_vei("4"), Some(4));
        assert_eq!(parse_vei("4.0"), Some(4));
        assert_eq!(parse_vei("9"), None);
        assert_eq!(parse_vei(""), None);
    }
}
