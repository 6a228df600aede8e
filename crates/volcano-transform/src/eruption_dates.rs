//! Completing partial eruption dates and matching sample years to eruptions.

use std::collections::BTreeSet;

use volcano_model::{CalendarDate, EruptionMatch, EruptionRecord};

/// Day used when a start day is missing.
pub const DEFAULT_START_DAY: u32 = 1;
/// Day used when an end day is missing; valid in every month.
pub const DEFAULT_END_DAY: u32 = 28;

/// Completes the start and end dates of an eruption.
///
/// Returns `None` when the start year is unknown. Otherwise every date field
/// of the returned record is set and the end date is strictly after the start.
pub fn fill_missing_dates(eruption: &EruptionRecord) -> Option<EruptionRecord> {
    let start_year = eruption.start_year?;
    let mut start_month = eruption.start_month;
    let mut end_year = eruption.end_year;
    let mut end_month = eruption.end_month;

    if end_month.is_some() && end_year.is_none() {
        end_year = Some(start_year);
    }

    if start_month.is_none()
        && let (Some(em), Some(ey)) = (end_month, end_year)
    {
        start_month = Some(if ey != start_year {
            em
        } else if em > 3 {
            em - 3
        } else {
            1
        });
    }
    if start_month.is_none() && end_month.is_none() {
        start_month = Some(6);
    }

    if let Some(sm) = start_month {
        if end_year.is_none() && end_month.is_none() {
            end_year = Some(if sm < 10 { start_year } else { start_year + 1 });
        }
        if let (Some(ey), None) = (end_year, end_month) {
            end_month = Some(if ey != start_year {
                sm
            } else if sm < 10 {
                sm + 3
            } else {
                12
            });
        }
    }

    let mut start = CalendarDate::new(
        start_year,
        start_month.unwrap_or(6),
        eruption.start_day.unwrap_or(DEFAULT_START_DAY),
    );
    let mut end = CalendarDate::new(
        end_year.unwrap_or(start_year),
        end_month.unwrap_or(start.month),
        eruption.end_day.unwrap_or(DEFAULT_END_DAY),
    );
    if end < start {
        end = start;
    }
    if end == start {
        if end.day < 27 {
            end.day += 2;
        } else {
            start.day -= 2;
        }
    }

    let mut filled = eruption.clone();
    filled.start_year = Some(start.year);
    filled.start_month = Some(start.month);
    filled.start_day = Some(start.day);
    filled.end_year = Some(end.year);
    filled.end_month = Some(end.month);
    filled.end_day = Some(end.day);
    Some(filled)
}

/// Finds the eruption a sample year belongs to.
///
/// An eruption ending in the sample year wins outright. Otherwise, among
/// eruptions spanning the year, the first confirmed one is preferred and the
/// first candidate is the fallback.
pub fn match_eruption<'a, I>(year: i32, eruptions: I) -> EruptionMatch<'a>
where
    I: IntoIterator<Item = &'a EruptionRecord>,
{
    let candidates: Vec<&'a EruptionRecord> = eruptions
        .into_iter()
        .filter(|eruption| eruption.start_year.is_some_and(|start| start <= year))
        .collect();

    if let Some(exact) = candidates
        .iter()
        .copied()
        .find(|eruption| eruption.effective_end_year() == Some(year))
    {
        return EruptionMatch::Exact(exact);
    }

    let spanning: Vec<&'a EruptionRecord> = candidates
        .into_iter()
        .filter(|eruption| eruption.effective_end_year().is_some_and(|end| year < end))
        .collect();
    spanning
        .iter()
        .copied()
        .find(|eruption| eruption.is_confirmed())
        .or_else(|| spanning.first().copied())
        .map_or(EruptionMatch::NotFound, EruptionMatch::Spanning)
}

/// Matches every distinct sample year, in ascending year order.
pub fn match_all_eruptions<'a, Y, I>(years: Y, eruptions: I) -> Vec<(i32, EruptionMatch<'a>)>
where
    Y: IntoIterator<Item = i32>,
    I: IntoIterator<Item = &'a EruptionRecord> + Clone,
{
    years
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|year| (year, match_eruption(year, eruptions.clone())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use volcano_model::{EruptionCategory, EruptionNumber, VolcanoId};

    fn eruption(
        number: u32,
        start: (Option<i32>, Option<u32>, Option<u32>),
        end: (Option<i32>, Option<u32>, Option<u32>),
    ) -> EruptionRecord {
        let mut record = EruptionRecord::new(EruptionNumber::new(number), VolcanoId::new(1));
        (record.start_year, record.start_month, record.start_day) = start;
        (record.end_year, record.end_month, record.end_day) = end;
        record
    }

    fn dates(record: &EruptionRecord) -> (CalendarDate, CalendarDate) {
        (
            record.start_date().expect("start"),
            record.end_date().expect("end"),
        )
    }

    #[test]
    fn test_no_start_year() {
        let record = eruption(1, (None, Some(3), None), (Some(2000), None, None));
        assert!(fill_missing_dates(&record).is_none());
    }

    #[test]
    fn test_start_month_from_end_in_other_year() {
        let record = eruption(1, (Some(1990), None, None), (Some(1992), Some(4), Some(10)));
        let filled = fill_missing_dates(&record).unwrap();
        assert_eq!(
            dates(&filled),
            (CalendarDate::new(1990, 4, 1), CalendarDate::new(1992, 4, 10))
        );
    }

    #[test]
    fn test_start_month_three_before_end_in_same_year() {
        let record = eruption(1, (Some(1990), None, None), (Some(1990), Some(8), None));
        let filled = fill_missing_dates(&record).unwrap();
        assert_eq!(
            dates(&filled),
            (CalendarDate::new(1990, 5, 1), CalendarDate::new(1990, 8, 28))
        );

        let early = eruption(1, (Some(1990), None, None), (Some(1990), Some(2), None));
        assert_eq!(fill_missing_dates(&early).unwrap().start_month, Some(1));
    }

    #[test]
    fn test_year_only() {
        let record = eruption(1, (Some(1883), None, None), (None, None, None));
        let filled = fill_missing_dates(&record).unwrap();
        assert_eq!(
            dates(&filled),
            (CalendarDate::new(1883, 6, 1), CalendarDate::new(1883, 9, 28))
        );
    }

    #[test]
    fn test_late_start_month_rolls_into_next_year() {
        let record = eruption(1, (Some(1883), Some(11), Some(2)), (None, None, None));
        let filled = fill_missing_dates(&record).unwrap();
        assert_eq!(
            dates(&filled),
            (CalendarDate::new(1883, 11, 2), CalendarDate::new(1884, 11, 28))
        );
    }

    #[test]
    fn test_known_end_year_in_same_year() {
        let record = eruption(1, (Some(1883), Some(11), None), (Some(1883), None, None));
        let filled = fill_missing_dates(&record).unwrap();
        assert_eq!(filled.end_month, Some(12));

        let other = eruption(1, (Some(1883), Some(5), None), (Some(1885), None, None));
        assert_eq!(fill_missing_dates(&other).unwrap().end_month, Some(5));
    }

    #[test]
    fn test_end_month_without_end_year() {
        let record = eruption(1, (Some(2000), Some(2), Some(3)), (None, Some(7), Some(9)));
        let filled = fill_missing_dates(&record).unwrap();
        assert_eq!(
            dates(&filled),
            (CalendarDate::new(2000, 2, 3), CalendarDate::new(2000, 7, 9))
        );
    }

    #[test]
    fn test_single_day_eruption_is_widened() {
        let record = eruption(1, (Some(2006), Some(3), Some(17)), (Some(2006), Some(3), Some(17)));
        let filled = fill_missing_dates(&record).unwrap();
        assert_eq!(
            dates(&filled),
            (CalendarDate::new(2006, 3, 17), CalendarDate::new(2006, 3, 19))
        );

        let late = eruption(1, (Some(2006), Some(3), Some(30)), (Some(2006), Some(3), Some(30)));
        let filled = fill_missing_dates(&late).unwrap();
        assert_eq!(
            dates(&filled),
            (CalendarDate::new(2006, 3, 28), CalendarDate::new(2006, 3, 30))
        );
    }

    #[test]
    fn test_inverted_end_is_clamped() {
        let record = eruption(1, (Some(2006), Some(5), Some(10)), (Some(2005), Some(1), Some(1)));
        let filled = fill_missing_dates(&record).unwrap();
        assert_eq!(
            dates(&filled),
            (CalendarDate::new(2006, 5, 10), CalendarDate::new(2006, 5, 12))
        );
    }

    fn day_strategy() -> impl Strategy<Value = Option<u32>> {
        proptest::option::of(1u32..=31)
    }

    fn month_strategy() -> impl Strategy<Value = Option<u32>> {
        proptest::option::of(1u32..=12)
    }

    proptest! {
        #[test]
        fn filled_range_is_never_empty_or_inverted(
            start_year in -5000i32..2100,
            span in proptest::option::of(-3i32..5),
            start_month in month_strategy(),
            start_day in day_strategy(),
            end_month in month_strategy(),
            end_day in day_strategy(),
        ) {
            let record = eruption(
                1,
                (Some(start_year), start_month, start_day),
                (span.map(|s| start_year + s), end_month, end_day),
            );
            let filled = fill_missing_dates(&record).unwrap();
            let (start, end) = dates(&filled);
            prop_assert!(start < end);
        }
    }

    #[test]
    fn test_match_exact() {
        let a = eruption(1, (Some(1990), None, None), (Some(1995), None, None));
        let b = eruption(2, (Some(1995), None, None), (None, None, None));
        let all = [a, b];
        match match_eruption(1995, &all) {
            EruptionMatch::Exact(found) => assert_eq!(found.eruption_number.get(), 1),
            other => panic!("expected exact match, got {other:?}"),
        }
    }

    #[test]
    fn test_match_spanning_prefers_confirmed() {
        let mut first = eruption(1, (Some(1980), None, None), (Some(2000), None, None));
        first.category = EruptionCategory::Uncertain;
        let mut second = eruption(2, (Some(1985), None, None), (Some(1999), None, None));
        second.category = EruptionCategory::Uncertain;
        let third = eruption(3, (Some(1989), None, None), (Some(1991), None, None));
        let fourth = eruption(4, (Some(1970), None, None), (Some(2010), None, None));
        let all = [first, second, third, fourth];
        let found = match_eruption(1990, &all);
        assert!(matches!(found, EruptionMatch::Spanning(e) if e.eruption_number.get() == 3));

        let unconfirmed: Vec<_> = all[..2].to_vec();
        let found = match_eruption(1990, &unconfirmed);
        assert!(matches!(found, EruptionMatch::Spanning(e) if e.eruption_number.get() == 1));
    }

    #[test]
    fn test_match_not_found() {
        let a = eruption(1, (Some(1990), None, None), (Some(1995), None, None));
        let undated = eruption(2, (None, None, None), (Some(1800), None, None));
        let all = [a, undated];
        assert!(matches!(match_eruption(1800, &all), EruptionMatch::NotFound));
        assert!(matches!(match_eruption(1996, &all), EruptionMatch::NotFound));
    }

    #[test]
    fn test_match_all_years() {
        let a = eruption(1, (Some(1990), None, None), (Some(1995), None, None));
        let all = [a];
        let matches = match_all_eruptions([1995, 1992, 1995, 1700], &all);
        let years: Vec<i32> = matches.iter().map(|(year, _)| *year).collect();
        assert_eq!(years, vec![1700, 1992, 1995]);
        assert!(matches!(matches[0].1, EruptionMatch::NotFound));
        assert!(matches!(matches[1].1, EruptionMatch::Spanning(_)));
        assert!(matches!(matches[2].1, EruptionMatch::Exact(_)));
    }
}
