//! Oxide cleaning and normalization.
//!
//! Raw archive cells may hold a pair of duplicate readings (`49.0\48.5` or
//! `49.0/48.5`); only the first one is kept. Missing or unparseable cells
//! count as zero. Total iron is derived when the archive omits it, then the
//! twelve major oxides are rescaled by `100 / (sum of majors - LOI)`.

use std::collections::BTreeMap;

use tracing::trace;
use volcano_model::{NormalizedOxides, Oxide, OxideValues, SampleIssue, SampleRecord};

/// Fe2O3 to FeO conversion factor.
pub const FE2O3_TO_FEO: f64 = 1.111;

/// First reading of a raw cell, as a number; `0.0` when absent or unparseable.
pub fn clean_value(raw: &str) -> f64 {
    let first = raw.split(['\\', '/']).next().unwrap_or("").trim();
    match first.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Cleans every raw oxide cell and derives total iron.
pub fn clean_oxides(raw: &BTreeMap<Oxide, String>) -> OxideValues {
    let mut values = OxideValues::default();
    for (oxide, cell) in raw {
        values.set(*oxide, clean_value(cell));
    }
    with_total_iron(values)
}

/// Fills FeOT from Fe2O3 and FeO when it is zero.
pub fn with_total_iron(mut values: OxideValues) -> OxideValues {
    if values.get(Oxide::FeOT) == 0.0 {
        let total = values.get(Oxide::Fe2O3) / FE2O3_TO_FEO + values.get(Oxide::FeO);
        values.set(Oxide::FeOT, total);
    }
    values
}

/// Sum of the twelve major oxides minus LOI.
pub fn normalization_denominator(values: &OxideValues) -> f64 {
    values.major_sum() - values.get(Oxide::Loi)
}

/// Rescales the major oxides to the normalization denominator.
pub fn normalize_oxides(values: &OxideValues) -> Result<NormalizedOxides, SampleIssue> {
    let denominator = normalization_denominator(values);
    if !denominator.is_finite() || denominator <= 0.0 {
        return Err(SampleIssue::NonNormalizable { denominator });
    }
    let factor = 100.0 / denominator;
    let mut normalized = [0.0; 12];
    for (slot, oxide) in normalized.iter_mut().zip(Oxide::MAJOR) {
        *slot = values.get(oxide) * factor;
    }
    Ok(NormalizedOxides::from_major(normalized))
}

/// Cleans and normalizes a sample in place.
///
/// Cleaned values are always stored; normalized values only when the
/// denominator is positive, otherwise the sample records `NonNormalizable`.
pub fn normalize_sample(sample: &mut SampleRecord) {
    let values = clean_oxides(&sample.raw_oxides);
    sample.oxides = Some(values);
    match normalize_oxides(&values) {
        Ok(normalized) => sample.normalized = Some(normalized),
        Err(issue) => {
            trace!(location = %sample.location, %issue, "sample not normalizable");
            sample.normalized = None;
            sample.push_issue(issue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_with(values: &[(Oxide, &str)]) -> SampleRecord {
        values
            .iter()
            .fold(SampleRecord::new("A / B", "R/F.csv"), |sample, (oxide, raw)| {
                sample.with_oxide(*oxide, *raw)
            })
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value("49.5"), 49.5);
        assert_eq!(clean_value(" 49.5\\48.1"), 49.5);
        assert_eq!(clean_value("49.5/48.1"), 49.5);
        assert_eq!(clean_value(""), 0.0);
        assert_eq!(clean_value("n.d."), 0.0);
        assert_eq!(clean_value("inf"), 0.0);
    }

    #[test]
    fn test_total_iron_derived_when_missing() {
        let values = clean_oxides(&BTreeMap::from([
            (Oxide::Fe2O3, "2.222".to_string()),
            (Oxide::FeO, "3".to_string()),
        ]));
        assert!((values.get(Oxide::FeOT) - 5.0).abs() < 1e-9);

        let kept = clean_oxides(&BTreeMap::from([
            (Oxide::Fe2O3, "2.222".to_string()),
            (Oxide::FeOT, "7".to_string()),
        ]));
        assert_eq!(kept.get(Oxide::FeOT), 7.0);
    }

    #[test]
    fn test_normalize_sample_with_loi() {
        let mut sample = sample_with(&[
            (Oxide::SiO2, "50"),
            (Oxide::Al2O3, "15"),
            (Oxide::FeOT, "10"),
            (Oxide::CaO, "10"),
            (Oxide::MgO, "8"),
            (Oxide::Na2O, "3"),
            (Oxide::K2O, "4"),
            (Oxide::Loi, "5"),
        ]);
        normalize_sample(&mut sample);
        let normalized = sample.normalized.expect("normalized");
        // denominator = 100 - 5
        assert!((normalized.silica() - 50.0 * 100.0 / 95.0).abs() < 1e-9);
        assert!((normalized.sum() - 100.0 * 100.0 / 95.0).abs() < 1e-9);
        assert!(sample.issues.is_empty());
        assert_eq!(sample.oxides.map(|v| v.get(Oxide::Loi)), Some(5.0));
    }

    #[test]
    fn test_non_positive_denominator_is_flagged() {
        let mut sample = sample_with(&[(Oxide::SiO2, "1"), (Oxide::Loi, "2")]);
        normalize_sample(&mut sample);
        assert!(sample.normalized.is_none());
        assert_eq!(
            sample.issues,
            vec![SampleIssue::NonNormalizable { denominator: -1.0 }]
        );

        let mut empty = SampleRecord::new("A", "R/F.csv");
        normalize_sample(&mut empty);
        assert!(empty.has_issue(|issue| matches!(issue, SampleIssue::NonNormalizable { .. })));
    }

    proptest! {
        #[test]
        fn normalized_majors_sum_to_100_without_loi(
            majors in proptest::collection::vec(0.0f64..80.0, 12),
        ) {
            let mut values = OxideValues::default();
            for (oxide, value) in Oxide::MAJOR.iter().zip(&majors) {
                values.set(*oxide, *value);
            }
            prop_assume!(values.major_sum() > 1e-6);
            let normalized = normalize_oxides(&values).unwrap();
            prop_assert!((normalized.sum() - 100.0).abs() < 1e-6);
        }
    }
}
