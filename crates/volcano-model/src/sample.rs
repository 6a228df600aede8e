//! Archive rock samples and their chemistry.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ModelError;
use crate::enums::Material;
use crate::rock::RockLabel;

/// Chemistry columns carried by archive files, in archive order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Oxide {
    SiO2,
    TiO2,
    B2O3,
    Al2O3,
    Cr2O3,
    Fe2O3,
    FeO,
    FeOT,
    CaO,
    MgO,
    MnO,
    NiO,
    K2O,
    Na2O,
    P2O5,
    H2O,
    H2OP,
    H2OM,
    H2OT,
    CO2,
    CO1,
    F,
    Cl,
    Cl2,
    OH,
    CH4,
    SO2,
    SO3,
    SO4,
    S,
    Loi,
}

impl Oxide {
    pub const COUNT: usize = 31;

    pub const ALL: [Oxide; 31] = [
        Oxide::SiO2,
        Oxide::TiO2,
        Oxide::B2O3,
        Oxide::Al2O3,
        Oxide::Cr2O3,
        Oxide::Fe2O3,
        Oxide::FeO,
        Oxide::FeOT,
        Oxide::CaO,
        Oxide::MgO,
        Oxide::MnO,
        Oxide::NiO,
        Oxide::K2O,
        Oxide::Na2O,
        Oxide::P2O5,
        Oxide::H2O,
        Oxide::H2OP,
        Oxide::H2OM,
        Oxide::H2OT,
        Oxide::CO2,
        Oxide::CO1,
        Oxide::F,
        Oxide::Cl,
        Oxide::Cl2,
        Oxide::OH,
        Oxide::CH4,
        Oxide::SO2,
        Oxide::SO3,
        Oxide::SO4,
        Oxide::S,
        Oxide::Loi,
    ];

    /// Major oxides rescaled by normalization, in output order.
    pub const MAJOR: [Oxide; 12] = [
        Oxide::SiO2,
        Oxide::TiO2,
        Oxide::Al2O3,
        Oxide::Fe2O3,
        Oxide::FeO,
        Oxide::FeOT,
        Oxide::CaO,
        Oxide::MgO,
        Oxide::MnO,
        Oxide::K2O,
        Oxide::Na2O,
        Oxide::P2O5,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Chemical formula as usually written.
    pub fn label(&self) -> &'static str {
        match self {
            Oxide::SiO2 => "SiO2",
            Oxide::TiO2 => "TiO2",
            Oxide::B2O3 => "B2O3",
            Oxide::Al2O3 => "Al2O3",
            Oxide::Cr2O3 => "Cr2O3",
            Oxide::Fe2O3 => "Fe2O3",
            Oxide::FeO => "FeO",
            Oxide::FeOT => "FeOT",
            Oxide::CaO => "CaO",
            Oxide::MgO => "MgO",
            Oxide::MnO => "MnO",
            Oxide::NiO => "NiO",
            Oxide::K2O => "K2O",
            Oxide::Na2O => "Na2O",
            Oxide::P2O5 => "P2O5",
            Oxide::H2O => "H2O",
            Oxide::H2OP => "H2OP",
            Oxide::H2OM => "H2OM",
            Oxide::H2OT => "H2OT",
            Oxide::CO2 => "CO2",
            Oxide::CO1 => "CO1",
            Oxide::F => "F",
            Oxide::Cl => "Cl",
            Oxide::Cl2 => "Cl2",
            Oxide::OH => "OH",
            Oxide::CH4 => "CH4",
            Oxide::SO2 => "SO2",
            Oxide::SO3 => "SO3",
            Oxide::SO4 => "SO4",
            Oxide::S => "S",
            Oxide::Loi => "LOI",
        }
    }

    /// Archive column header, e.g. `SIO2(WT%)`.
    pub fn column_name(&self) -> String {
        format!("{}(WT%)", self.label().to_uppercase())
    }

    /// Looks up an oxide by archive header.
    pub fn from_column(column: &str) -> Option<Self> {
        let upper = column.trim().to_uppercase();
        let name = upper.strip_suffix("(WT%)").unwrap_or(&upper).trim();
        Oxide::ALL
            .iter()
            .copied()
            .find(|oxide| oxide.label().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Oxide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Oxide {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Oxide::from_column(s).ok_or_else(|| ModelError::UnknownOxide(s.to_string()))
    }
}

/// Cleaned numeric value for every [`Oxide`]; absent readings are `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OxideValues {
    values: [f64; Oxide::COUNT],
}

impl Default for OxideValues {
    fn default() -> Self {
        Self {
            values: [0.0; Oxide::COUNT],
        }
    }
}

impl OxideValues {
    pub fn get(&self, oxide: Oxide) -> f64 {
        self.values[oxide.index()]
    }

    pub fn set(&mut self, oxide: Oxide, value: f64) {
        self.values[oxide.index()] = value;
    }

    #[must_use]
    pub fn with(mut self, oxide: Oxide, value: f64) -> Self {
        self.set(oxide, value);
        self
    }

    /// Sum of [`Oxide::MAJOR`].
    pub fn major_sum(&self) -> f64 {
        Oxide::MAJOR.iter().map(|oxide| self.get(*oxide)).sum()
    }
}

/// The twelve major oxides rescaled to the normalization denominator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedOxides {
    values: [f64; 12],
}

impl NormalizedOxides {
    /// Values in [`Oxide::MAJOR`] order.
    pub fn from_major(values: [f64; 12]) -> Self {
        Self { values }
    }

    /// Normalized value of a major oxide; `None` for oxides outside the subset.
    pub fn get(&self, oxide: Oxide) -> Option<f64> {
        let position = Oxide::MAJOR.iter().position(|major| *major == oxide)?;
        Some(self.values[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Oxide, f64)> + '_ {
        Oxide::MAJOR.iter().copied().zip(self.values.iter().copied())
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn silica(&self) -> f64 {
        self.values[0]
    }

    /// Na2O + K2O.
    pub fn total_alkali(&self) -> f64 {
        self.values[9] + self.values[10]
    }
}

/// Recoverable per-sample conditions recorded during enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SampleIssue {
    /// The normalization denominator was zero or negative.
    #[error("normalization denominator {denominator} is not positive")]
    NonNormalizable { denominator: f64 },

    /// Silica or alkali values were not positive.
    #[error("rock type undetermined from chemistry")]
    UndeterminedRock,

    /// No explicit year and none found in the location comment.
    #[error("no date found in location comment")]
    DateExtractionMiss,
}

/// One archive row, enriched in place as it moves through the stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Raw `/`-separated location path.
    pub location: String,
    pub location_comment: String,
    pub latitude_min: Option<f64>,
    pub latitude_max: Option<f64>,
    pub longitude_min: Option<f64>,
    pub longitude_max: Option<f64>,
    pub sample_name: String,
    pub rock_name: String,
    pub material: Material,
    pub tectonic_setting: String,
    pub eruption_year: Option<i32>,
    pub eruption_month: Option<u32>,
    pub eruption_day: Option<u32>,
    /// `REGION/file` the row was read from.
    pub source_file: String,
    /// Raw chemistry cells as they appear in the archive.
    pub raw_oxides: BTreeMap<Oxide, String>,
    /// Cleaned values for every oxide, set by normalization.
    pub oxides: Option<OxideValues>,
    pub normalized: Option<NormalizedOxides>,
    pub rock: Option<RockLabel>,
    /// Year found in the location comment when `eruption_year` is missing.
    pub inferred_year: Option<i32>,
    pub issues: Vec<SampleIssue>,
}

impl SampleRecord {
    pub fn new(location: impl Into<String>, source_file: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            location_comment: String::new(),
            latitude_min: None,
            latitude_max: None,
            longitude_min: None,
            longitude_max: None,
            sample_name: String::new(),
            rock_name: String::new(),
            material: Material::Unknown,
            tectonic_setting: String::new(),
            eruption_year: None,
            eruption_month: None,
            eruption_day: None,
            source_file: source_file.into(),
            raw_oxides: BTreeMap::new(),
            oxides: None,
            normalized: None,
            rock: None,
            inferred_year: None,
            issues: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_oxide(mut self, oxide: Oxide, raw: impl Into<String>) -> Self {
        self.raw_oxides.insert(oxide, raw.into());
        self
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.location_comment = comment.into();
        self
    }

    /// Records an issue once.
    pub fn push_issue(&mut self, issue: SampleIssue) {
        if !self.issues.contains(&issue) {
            self.issues.push(issue);
        }
    }

    pub fn has_issue(&self, matches: impl Fn(&SampleIssue) -> bool) -> bool {
        self.issues.iter().any(matches)
    }

    /// Explicit eruption year, or the one inferred from the comment.
    pub fn effective_year(&self) -> Option<i32> {
        self.eruption_year.or(self.inferred_year)
    }

    /// `Y`, `Y-M`, or `Y-M-D` built from the explicit date columns.
    pub fn explicit_date_label(&self) -> Option<String> {
        let year = self.eruption_year?;
        Some(match (self.eruption_month, self.eruption_day) {
            (Some(month), Some(day)) => format!("{year}-{month}-{day}"),
            (Some(month), None) => format!("{year}-{month}"),
            _ => year.to_string(),
        })
    }

    /// Location path components, trimmed.
    pub fn location_parts(&self) -> Vec<&str> {
        self.location.split('/').map(str::trim).collect()
    }
}
