//! Sample enrichment and eruption date handling.
//!
//! Archive samples pass through three stages, each writing its result back
//! onto the [`SampleRecord`]:
//!
//! 1. [`normalize_sample`]: clean the raw chemistry and rescale the majors
//! 2. [`classify_sample`]: assign a TAS rock label
//! 3. [`infer_sample_year`]: find a year in the location comment
//!
//! Recoverable failures are recorded as [`volcano_model::SampleIssue`] values
//! on the sample. [`enrich_sample`] runs all three.
//!
//! Registry-side date handling lives in [`eruption_dates`]: completing partial
//! eruption dates and matching sample years to eruptions.

pub mod anomaly;
pub mod catalogue;
pub mod datetime;
pub mod eruption_dates;
pub mod oxides;
pub mod petrology;

pub use anomaly::{ChemAnomaly, detect_anomalies, mean_and_std};
pub use catalogue::{SampleDate, date_catalogue, filter_by_date};
pub use datetime::{extract_year, infer_sample_year};
pub use eruption_dates::{fill_missing_dates, match_all_eruptions, match_eruption};
pub use oxides::{
    FE2O3_TO_FEO, clean_oxides, clean_value, normalization_denominator, normalize_oxides,
    normalize_sample, with_total_iron,
};
pub use petrology::{RULES, TasPoint, classify, classify_point, classify_sample};

use volcano_model::SampleRecord;

/// Runs every enrichment stage on one sample.
pub fn enrich_sample(sample: &mut SampleRecord) {
    normalize_sample(sample);
    classify_sample(sample);
    infer_sample_year(sample);
}

/// Enriches a batch of samples in place.
pub fn enrich_samples(samples: &mut [SampleRecord]) {
    let _span = tracing::debug_span!("enrich_samples", count = samples.len()).entered();
    samples.iter_mut().for_each(enrich_sample);
}
