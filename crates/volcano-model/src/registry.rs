//! Registry records: volcanoes, eruptions, and eruption events.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::EruptionCategory;
use crate::ids::{EruptionNumber, VolcanoId};
use crate::rock::RegistryRock;

/// Number of rock slots per volcano (five major then five minor).
pub const ROCK_SLOT_COUNT: usize = 10;

/// Registry primary volcano types in marker-shape order.
pub const PRIMARY_SHAPES: [&str; 28] = [
    "Shield(s)",
    "Stratovolcano(es)",
    "Caldera",
    "Stratovolcano",
    "Submarine",
    "Shield",
    "Fissure vent(s)",
    "Complex",
    "Pyroclastic shield",
    "Pyroclastic cone(s)",
    "Pyroclastic cone",
    "Volcanic field",
    "Caldera(s)",
    "Lava dome(s)",
    "Lava cone",
    "Compound",
    "Maar",
    "Crater rows",
    "Tuff ring(s)",
    "Explosion crater(s)",
    "Complex(es)",
    "Tuff cone(s)",
    "Fissure vent",
    "Subglacial",
    "Cone(s)",
    "Maar(s)",
    "Lava dome",
    "Stratovolcano?",
];

/// Index of a primary volcano type in [`PRIMARY_SHAPES`].
pub fn primary_shape_code(primary_type: &str) -> Option<usize> {
    let trimmed = primary_type.trim();
    PRIMARY_SHAPES.iter().position(|shape| *shape == trimmed)
}

/// One row of the registry volcano list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolcanoRecord {
    pub id: VolcanoId,
    /// Display name, unique once colliding names have been disambiguated.
    pub name: String,
    pub country: String,
    pub subregion: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub tectonic_setting: String,
    pub primary_type: String,
    /// Major rock 1-5 followed by minor rock 1-5.
    pub rock_slots: [Option<RegistryRock>; ROCK_SLOT_COUNT],
}

impl VolcanoRecord {
    pub fn new(id: VolcanoId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            country: String::new(),
            subregion: String::new(),
            latitude: None,
            longitude: None,
            tectonic_setting: String::new(),
            primary_type: String::new(),
            rock_slots: [None; ROCK_SLOT_COUNT],
        }
    }

    pub fn primary_shape_code(&self) -> Option<usize> {
        primary_shape_code(&self.primary_type)
    }

    /// Both coordinates, when the registry provides them.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// One row of the registry eruption list.
///
/// Month and day values of `0` in the source are stored as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EruptionRecord {
    pub eruption_number: EruptionNumber,
    pub volcano_id: VolcanoId,
    pub volcano_name: String,
    pub category: EruptionCategory,
    pub vei: Option<u8>,
    pub start_year: Option<i32>,
    pub start_month: Option<u32>,
    pub start_day: Option<u32>,
    pub end_year: Option<i32>,
    pub end_month: Option<u32>,
    pub end_day: Option<u32>,
}

impl EruptionRecord {
    pub fn new(eruption_number: EruptionNumber, volcano_id: VolcanoId) -> Self {
        Self {
            eruption_number,
            volcano_id,
            volcano_name: String::new(),
            category: EruptionCategory::Confirmed,
            vei: None,
            start_year: None,
            start_month: None,
            start_day: None,
            end_year: None,
            end_month: None,
            end_day: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.category == EruptionCategory::Confirmed
    }

    /// End year, or the start year when the registry omits the end.
    pub fn effective_end_year(&self) -> Option<i32> {
        self.end_year.or(self.start_year)
    }

    /// Start date when year, month, and day are all present.
    pub fn start_date(&self) -> Option<CalendarDate> {
        Some(CalendarDate::new(
            self.start_year?,
            self.start_month?,
            self.start_day?,
        ))
    }

    /// End date when year, month, and day are all present.
    pub fn end_date(&self) -> Option<CalendarDate> {
        Some(CalendarDate::new(self.end_year?, self.end_month?, self.end_day?))
    }

    /// Start date parts as recorded, e.g. `1883-5-?`.
    pub fn recorded_start(&self) -> String {
        format_parts(self.start_year, self.start_month, self.start_day)
    }

    /// End date parts as recorded.
    pub fn recorded_end(&self) -> String {
        format_parts(self.end_year, self.end_month, self.end_day)
    }
}

fn format_parts(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> String {
    fn part<T: fmt::Display>(value: Option<T>) -> String {
        value.map_or_else(|| "?".to_string(), |v| v.to_string())
    }
    format!("{}-{}-{}", part(year), part(month), part(day))
}

/// One row of the registry event table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub eruption_number: EruptionNumber,
    pub volcano_id: VolcanoId,
    pub volcano_name: String,
    pub event_type: String,
}

/// A year/month/day triple ordered chronologically.
///
/// Values are not validated against the calendar; filled eruption dates use
/// day 28 as the end-of-month default so they stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CalendarDate {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Converts to a calendar date when the triple is valid.
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_codes() {
        assert_eq!(primary_shape_code("Stratovolcano"), Some(3));
        assert_eq!(primary_shape_code(" Stratovolcano? "), Some(27));
        assert_eq!(primary_shape_code("Unknown"), None);
    }

    #[test]
    fn eruption_dates_require_all_parts() {
        let mut eruption = EruptionRecord::new(EruptionNumber::new(1), VolcanoId::new(2));
        eruption.start_year = Some(1991);
        eruption.start_month = Some(6);
        assert!(eruption.start_date().is_none());
        eruption.start_day = Some(15);
        assert_eq!(eruption.start_date(), Some(CalendarDate::new(1991, 6, 15)));
        assert_eq!(eruption.effective_end_year(), Some(1991));
        assert_eq!(eruption.recorded_start(), "1991-6-15");
        assert_eq!(eruption.recorded_end(), "?-?-?");
    }

    #[test]
    fn calendar_dates_order_chronologically() {
        assert!(CalendarDate::new(1990, 12, 31) < CalendarDate::new(1991, 1, 1));
        assert!(CalendarDate::new(1991, 2, 30).to_naive_date().is_none());
    }
}
