//! Chronogram rows for a set of eruptions.
//!
//! Eruptions from [`MODERN_FROM_YEAR`] on get completed calendar dates;
//! earlier ones are year spans. Missing VEI values are filled from the next
//! known VEI further down the list, or [`DEFAULT_VEI`].

use serde::Serialize;
use tracing::debug;
use volcano_model::{CalendarDate, EruptionNumber, EruptionRecord, EventRecord, VolcanoId};
use volcano_transform::fill_missing_dates;

use crate::events::{EventSummary, summarize_events};

/// First year plotted with calendar dates.
pub const MODERN_FROM_YEAR: i32 = 1679;

/// VEI used when no later eruption in the list has one.
pub const DEFAULT_VEI: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimelineSpan {
    Dated {
        start: CalendarDate,
        end: CalendarDate,
    },
    Years {
        start_year: i32,
        end_year: i32,
        /// Starts before the common era.
        bce: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub eruption_number: EruptionNumber,
    pub volcano_id: VolcanoId,
    pub volcano_name: String,
    pub span: TimelineSpan,
    /// Dates as recorded, with `?` for missing parts.
    pub recorded_start: String,
    pub recorded_end: String,
    pub vei: u8,
    pub vei_recorded: bool,
    pub events: EventSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    pub modern: Vec<TimelineRow>,
    /// Year-only rows before [`MODERN_FROM_YEAR`].
    pub early: Vec<TimelineRow>,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.modern.is_empty() && self.early.is_empty()
    }
}

/// Fills each unknown VEI with the next known one after it.
pub fn backfill_vei(veis: &[Option<u8>]) -> Vec<u8> {
    let mut next_known = None;
    let mut filled: Vec<u8> = veis
        .iter()
        .rev()
        .map(|vei| {
            next_known = vei.or(next_known);
            next_known.unwrap_or(DEFAULT_VEI)
        })
        .collect();
    filled.reverse();
    filled
}

fn rows<F>(eruptions: &[&EruptionRecord], events: &[EventRecord], span_of: F) -> Vec<TimelineRow>
where
    F: Fn(&EruptionRecord) -> Option<TimelineSpan>,
{
    let spanned: Vec<(&EruptionRecord, TimelineSpan)> = eruptions
        .iter()
        .filter_map(|eruption| span_of(eruption).map(|span| (*eruption, span)))
        .collect();
    let veis: Vec<Option<u8>> = spanned.iter().map(|(eruption, _)| eruption.vei).collect();
    let mut summaries = summarize_events(
        spanned.iter().map(|(eruption, _)| eruption.eruption_number),
        events,
    );
    spanned
        .iter()
        .zip(backfill_vei(&veis))
        .map(|((eruption, span), vei)| TimelineRow {
            eruption_number: eruption.eruption_number,
            volcano_id: eruption.volcano_id,
            volcano_name: eruption.volcano_name.clone(),
            span: *span,
            recorded_start: eruption.recorded_start(),
            recorded_end: eruption.recorded_end(),
            vei,
            vei_recorded: eruption.vei.is_some(),
            events: summaries
                .remove(&eruption.eruption_number)
                .unwrap_or_else(|| EventSummary::empty(eruption.eruption_number)),
        })
        .collect()
}

/// Builds chronogram rows for eruptions given in registry order.
///
/// Eruptions without a start year are skipped. Modern rows are limited to
/// start years at or after the earliest start year carrying a VEI.
pub fn build_timeline(eruptions: &[&EruptionRecord], events: &[EventRecord]) -> Timeline {
    let earliest_with_vei = eruptions
        .iter()
        .filter(|eruption| eruption.vei.is_some())
        .filter_map(|eruption| eruption.start_year)
        .min();

    let modern = rows(eruptions, events, |eruption| {
        let start = eruption.start_year?;
        if start < MODERN_FROM_YEAR || earliest_with_vei.is_none_or(|earliest| start < earliest) {
            return None;
        }
        let filled = fill_missing_dates(eruption)?;
        Some(TimelineSpan::Dated {
            start: filled.start_date()?,
            end: filled.end_date()?,
        })
    });
    let early = rows(eruptions, events, |eruption| {
        let start = eruption.start_year.filter(|year| *year < MODERN_FROM_YEAR)?;
        Some(TimelineSpan::Years {
            start_year: start,
            end_year: eruption.end_year.unwrap_or(start),
            bce: start < 0,
        })
    });
    debug!(
        eruptions = eruptions.len(),
        modern = modern.len(),
        early = early.len(),
        "timeline built"
    );
    Timeline { modern, early }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eruption(number: u32, start: i32, end: Option<i32>, vei: Option<u8>) -> EruptionRecord {
        let mut record = EruptionRecord::new(EruptionNumber::new(number), VolcanoId::new(1));
        record.volcano_name = "Etna".to_string();
        record.start_year = Some(start);
        record.end_year = end;
        record.vei = vei;
        record
    }

    #[test]
    fn test_backfill_vei() {
        assert_eq!(
            backfill_vei(&[None, Some(3), None, None, Some(1), None]),
            vec![3, 3, 1, 1, 1, 2]
        );
        assert!(backfill_vei(&[]).is_empty());
    }

    #[test]
    fn test_modern_and_early_rows() {
        let all = [
            eruption(1, 2001, Some(2001), None),
            eruption(2, 1900, None, Some(2)),
            eruption(3, 1800, None, None),
            eruption(4, 1500, Some(1502), Some(4)),
            eruption(5, -1200, None, None),
        ];
        let refs: Vec<&EruptionRecord> = all.iter().collect();
        let events = vec![EventRecord {
            eruption_number: EruptionNumber::new(1),
            volcano_id: VolcanoId::new(1),
            volcano_name: "Etna".to_string(),
            event_type: "Lava flow(s)".to_string(),
        }];
        let timeline = build_timeline(&refs, &events);

        let modern: Vec<u32> = timeline
            .modern
            .iter()
            .map(|row| row.eruption_number.get())
            .collect();
        assert_eq!(modern, vec![1, 2, 3]);
        assert_eq!(timeline.modern[0].vei, 2);
        assert!(!timeline.modern[0].vei_recorded);
        assert_eq!(timeline.modern[2].vei, DEFAULT_VEI);
        assert_eq!(timeline.modern[0].events.count, 1);
        assert_eq!(timeline.modern[0].recorded_start, "2001-?-?");
        assert_eq!(
            timeline.modern[1].span,
            TimelineSpan::Dated {
                start: CalendarDate::new(1900, 6, 1),
                end: CalendarDate::new(1900, 9, 28),
            }
        );

        assert_eq!(timeline.early.len(), 2);
        assert_eq!(
            timeline.early[1].span,
            TimelineSpan::Years {
                start_year: -1200,
                end_year: -1200,
                bce: true
            }
        );
        assert_eq!(timeline.early[1].vei, DEFAULT_VEI);
        assert_eq!(timeline.early[0].vei, 4);
    }

    #[test]
    fn test_modern_rows_need_a_vei_somewhere() {
        let all = [eruption(1, 2001, None, None)];
        let refs: Vec<&EruptionRecord> = all.iter().collect();
        let timeline = build_timeline(&refs, &[]);
        assert!(timeline.modern.is_empty());
        assert!(timeline.early.is_empty());
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_modern_rows_start_at_earliest_vei() {
        let all = [
            eruption(1, 1950, None, Some(1)),
            eruption(2, 1940, None, None),
        ];
        let refs: Vec<&EruptionRecord> = all.iter().collect();
        let timeline = build_timeline(&refs, &[]);
        assert_eq!(timeline.modern.len(), 1);
    }
}
