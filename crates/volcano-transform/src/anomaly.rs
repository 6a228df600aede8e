//! Chemistry anomaly labels.
//!
//! Within a sample set, a sample is anomalous in FeO, CaO, or MgO when its
//! normalized value exceeds the set mean plus one sample standard deviation.

use std::fmt;

use serde::Serialize;
use volcano_model::{NormalizedOxides, Oxide, SampleRecord};

/// Silica ceiling for samples taking part in anomaly detection.
pub const MAX_SILICA: f64 = 80.0;

/// Which of FeO, CaO, and MgO are anomalous, as a 3-bit mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct ChemAnomaly(u8);

impl ChemAnomaly {
    pub const NONE: Self = Self(0);
    pub const FEO: Self = Self(1);
    pub const CAO: Self = Self(2);
    pub const MGO: Self = Self(4);

    const LABELS: [&'static str; 8] = [
        "NONE",
        "FEO",
        "CAO",
        "FEO+CAO",
        "MGO",
        "FEO+MGO",
        "CAO+MGO",
        "FEO+CAO+MGO",
    ];

    const TRACKED: [(Oxide, Self); 3] = [
        (Oxide::FeO, Self::FEO),
        (Oxide::CaO, Self::CAO),
        (Oxide::MgO, Self::MGO),
    ];

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_anomalous(self) -> bool {
        self.0 != 0
    }

    pub fn label(self) -> &'static str {
        Self::LABELS[usize::from(self.0 & 0b111)]
    }
}

impl std::ops::BitOr for ChemAnomaly {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ChemAnomaly {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for ChemAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<ChemAnomaly> for String {
    fn from(anomaly: ChemAnomaly) -> Self {
        anomaly.label().to_string()
    }
}

/// Mean and sample standard deviation; a single value has deviation 0.
pub fn mean_and_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if values.len() == 1 {
        return Some((mean, 0.0));
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some((mean, variance.sqrt()))
}

fn participates(normalized: &NormalizedOxides) -> bool {
    let silica = normalized.silica();
    silica > 0.0 && silica <= MAX_SILICA && normalized.get(Oxide::FeOT).unwrap_or(0.0) > 0.0
}

/// Labels every participating sample, returned with its index in `samples`.
///
/// Samples without normalized chemistry, with silica outside `(0, 80]`, or
/// without total iron are skipped.
pub fn detect_anomalies(samples: &[SampleRecord]) -> Vec<(usize, ChemAnomaly)> {
    let selected: Vec<(usize, &NormalizedOxides)> = samples
        .iter()
        .enumerate()
        .filter_map(|(idx, sample)| sample.normalized.as_ref().map(|n| (idx, n)))
        .filter(|(_, normalized)| participates(normalized))
        .collect();

    let thresholds: Vec<(Oxide, ChemAnomaly, f64)> = ChemAnomaly::TRACKED
        .iter()
        .filter_map(|(oxide, flag)| {
            let values: Vec<f64> = selected
                .iter()
                .map(|(_, n)| n.get(*oxide).unwrap_or(0.0))
                .collect();
            mean_and_std(&values).map(|(mean, std)| (*oxide, *flag, mean + std))
        })
        .collect();

    selected
        .iter()
        .map(|(idx, normalized)| {
            let mut anomaly = ChemAnomaly::NONE;
            for (oxide, flag, threshold) in &thresholds {
                if normalized.get(*oxide).unwrap_or(0.0) > *threshold {
                    anomaly |= *flag;
                }
            }
            (*idx, anomaly)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oxides::normalize_sample;

    fn sample(feo: &str, cao: &str, mgo: &str) -> SampleRecord {
        let mut sample = SampleRecord::new("A", "R/F.csv")
            .with_oxide(Oxide::SiO2, "50")
            .with_oxide(Oxide::FeO, feo)
            .with_oxide(Oxide::CaO, cao)
            .with_oxide(Oxide::MgO, mgo)
            .with_oxide(Oxide::Al2O3, "15");
        normalize_sample(&mut sample);
        sample
    }

    #[test]
    fn test_labels() {
        assert_eq!(ChemAnomaly::NONE.label(), "NONE");
        assert_eq!((ChemAnomaly::FEO | ChemAnomaly::MGO).label(), "FEO+MGO");
        assert_eq!(
            (ChemAnomaly::FEO | ChemAnomaly::CAO | ChemAnomaly::MGO).to_string(),
            "FEO+CAO+MGO"
        );
        assert!((ChemAnomaly::CAO | ChemAnomaly::MGO).contains(ChemAnomaly::MGO));
    }

    #[test]
    fn test_mean_and_std() {
        assert_eq!(mean_and_std(&[]), None);
        assert_eq!(mean_and_std(&[3.0]), Some((3.0, 0.0)));
        let (mean, std) = mean_and_std(&[2.0, 4.0, 6.0]).unwrap();
        assert_eq!(mean, 4.0);
        assert!((std - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_sample_is_never_anomalous() {
        let samples = vec![sample("10", "10", "10")];
        assert_eq!(detect_anomalies(&samples), vec![(0, ChemAnomaly::NONE)]);
    }

    #[test]
    fn test_outlier_is_flagged() {
        let samples = vec![
            sample("8", "10", "5"),
            sample("8", "10", "5"),
            sample("8", "10", "5"),
            sample("20", "10", "5"),
        ];
        let anomalies = detect_anomalies(&samples);
        assert_eq!(anomalies.len(), 4);
        assert_eq!(anomalies[3], (3, ChemAnomaly::FEO));
        assert!(anomalies[..3].iter().all(|(_, a)| !a.is_anomalous()));
    }

    #[test]
    fn test_samples_outside_silica_range_are_skipped() {
        let mut no_iron = SampleRecord::new("A", "R/F.csv").with_oxide(Oxide::SiO2, "50");
        normalize_sample(&mut no_iron);
        let raw = SampleRecord::new("B", "R/F.csv");
        let samples = vec![no_iron, raw, sample("8", "10", "5")];
        let anomalies = detect_anomalies(&samples);
        assert_eq!(anomalies, vec![(2, ChemAnomaly::NONE)]);
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&(ChemAnomaly::CAO | ChemAnomaly::FEO)).unwrap();
        assert_eq!(json, "\"FEO+CAO\"");
    }
}
