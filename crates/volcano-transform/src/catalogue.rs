//! Explicit eruption dates present in a sample set.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use volcano_model::{ModelError, SampleRecord};

/// An archive eruption date with optional month and day.
///
/// Ordering is chronological with less precise dates first, so a year sorts
/// before any of its months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SampleDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl SampleDate {
    /// Explicit date of a sample; a day without a month is dropped.
    pub fn of(sample: &SampleRecord) -> Option<Self> {
        let year = sample.eruption_year?;
        let month = sample.eruption_month;
        Some(Self {
            year,
            month,
            day: month.and(sample.eruption_day),
        })
    }

    pub fn matches(&self, sample: &SampleRecord) -> bool {
        Self::of(sample).as_ref() == Some(self)
    }
}

impl fmt::Display for SampleDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{month}")?;
            if let Some(day) = self.day {
                write!(f, "-{day}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for SampleDate {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ModelError::InvalidSampleDate(s.to_string());
        // A leading '-' belongs to a negative year.
        let (sign, rest) = match s.trim().strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, s.trim()),
        };
        let mut parts = rest.split('-');
        let year: i32 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let mut next = || -> Result<Option<u32>, ModelError> {
            parts
                .next()
                .map(|p| p.parse::<u32>().map_err(|_| invalid()))
                .transpose()
        };
        let month = next()?;
        let day = next()?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self {
            year: sign * year,
            month,
            day,
        })
    }
}

/// Distinct explicit dates in a sample set, newest first.
pub fn date_catalogue(samples: &[SampleRecord]) -> Vec<SampleDate> {
    samples
        .iter()
        .filter_map(SampleDate::of)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// Samples whose explicit date is exactly `date`.
pub fn filter_by_date<'a>(samples: &'a [SampleRecord], date: &SampleDate) -> Vec<&'a SampleRecord> {
    samples.iter().filter(|sample| date.matches(sample)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dated(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> SampleRecord {
        let mut sample = SampleRecord::new("A", "R/F.csv");
        sample.eruption_year = year;
        sample.eruption_month = month;
        sample.eruption_day = day;
        sample
    }

    #[test]
    fn test_catalogue_is_distinct_and_newest_first() {
        let samples = vec![
            dated(Some(1883), Some(8), Some(27)),
            dated(Some(1883), None, None),
            dated(Some(1902), None, None),
            dated(Some(1883), Some(8), Some(27)),
            dated(None, Some(1), Some(1)),
            dated(Some(1883), None, Some(4)),
        ];
        let labels: Vec<String> = date_catalogue(&samples)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(labels, vec!["1902", "1883-8-27", "1883"]);
    }

    #[test]
    fn test_filter_by_date() {
        let samples = vec![
            dated(Some(1883), Some(8), Some(27)),
            dated(Some(1883), None, None),
            dated(Some(1883), Some(8), None),
        ];
        let date: SampleDate = "1883-8".parse().unwrap();
        let found = filter_by_date(&samples, &date);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].eruption_day, None);
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            "1883-8-27".parse::<SampleDate>().unwrap(),
            SampleDate {
                year: 1883,
                month: Some(8),
                day: Some(27)
            }
        );
        assert_eq!("-450".parse::<SampleDate>().unwrap().year, -450);
        assert!("1883-x".parse::<SampleDate>().is_err());
        assert!("1883-1-2-3".parse::<SampleDate>().is_err());
        assert!("".parse::<SampleDate>().is_err());
    }
}
