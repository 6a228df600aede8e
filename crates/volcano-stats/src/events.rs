//! Eruptive event summaries and per-volcano event counts.

use std::collections::BTreeMap;

use serde::Serialize;
use volcano_model::{EruptionNumber, EventRecord, VolcanoId, VolcanoRecord};

/// Registry event types that describe eruptive activity.
pub const ERUPTIVE_EVENTS: [&str; 17] = [
    "Phreatic activity",
    "Lava lake",
    "Lava fountains",
    "Cinder cone formation",
    "Fissure formation",
    "Lava flow(s)",
    "Island formation",
    "Lava dome formation",
    "Spine formation",
    "Phreatomagmatic eruption",
    "Explosion",
    "Partial collapse at end of eruption",
    "Avalanche",
    "Tsunami",
    "Directed explosion",
    "Crater formation",
    "Caldera formation",
];

pub fn is_eruptive(event_type: &str) -> bool {
    ERUPTIVE_EVENTS.contains(&event_type.trim())
}

/// Severity class from an eruptive event count: 1, 2, 4, 6, or 8.
pub fn severity_class(count: usize) -> u8 {
    match count {
        0..=2 => 1,
        3..=6 => 2,
        7..=12 => 4,
        13..=17 => 6,
        _ => 8,
    }
}

/// Eruptive events of one eruption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSummary {
    pub eruption_number: EruptionNumber,
    /// Event types in registry order; repeats are kept.
    pub events: Vec<String>,
    pub count: usize,
    pub severity: u8,
}

impl EventSummary {
    pub fn empty(eruption_number: EruptionNumber) -> Self {
        Self {
            eruption_number,
            events: Vec::new(),
            count: 0,
            severity: severity_class(0),
        }
    }

    /// Events joined by `, `.
    pub fn event_list(&self) -> String {
        self.events.join(", ")
    }
}

/// Summarizes the eruptive events of every eruption number given.
///
/// Eruptions without eruptive events get an empty summary.
pub fn summarize_events<'a, N, E>(eruptions: N, events: E) -> BTreeMap<EruptionNumber, EventSummary>
where
    N: IntoIterator<Item = EruptionNumber>,
    E: IntoIterator<Item = &'a EventRecord>,
{
    let mut summaries: BTreeMap<EruptionNumber, EventSummary> = eruptions
        .into_iter()
        .map(|number| (number, EventSummary::empty(number)))
        .collect();
    for event in events {
        if !is_eruptive(&event.event_type) {
            continue;
        }
        if let Some(summary) = summaries.get_mut(&event.eruption_number) {
            summary.events.push(event.event_type.trim().to_string());
        }
    }
    for summary in summaries.values_mut() {
        summary.count = summary.events.len();
        summary.severity = severity_class(summary.count);
    }
    summaries
}

/// Occurrences of each requested event type at one volcano.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolcanoEventCounts {
    pub volcano_id: VolcanoId,
    pub volcano_name: String,
    /// Counts aligned with the requested event types.
    pub counts: Vec<usize>,
}

/// Counts each of `event_types` per volcano, in the order volcanoes are given.
pub fn event_counts_by_volcano<'a, V>(
    volcanoes: V,
    events: &[EventRecord],
    event_types: &[&str],
) -> Vec<VolcanoEventCounts>
where
    V: IntoIterator<Item = &'a VolcanoRecord>,
{
    volcanoes
        .into_iter()
        .map(|volcano| {
            let counts = event_types
                .iter()
                .map(|wanted| {
                    events
                        .iter()
                        .filter(|event| {
                            event.volcano_id == volcano.id && event.event_type.trim() == *wanted
                        })
                        .count()
                })
                .collect();
            VolcanoEventCounts {
                volcano_id: volcano.id,
                volcano_name: volcano.name.clone(),
                counts,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(eruption: u32, volcano: u32, event_type: &str) -> EventRecord {
        EventRecord {
            eruption_number: EruptionNumber::new(eruption),
            volcano_id: VolcanoId::new(volcano),
            volcano_name: String::new(),
            event_type: event_type.to_string(),
        }
    }

    #[test]
    fn test_severity_class() {
        let classes: Vec<u8> = [0, 2, 3, 6, 7, 12, 13, 17, 18]
            .into_iter()
            .map(severity_class)
            .collect();
        assert_eq!(classes, vec![1, 1, 2, 2, 4, 4, 6, 6, 8]);
    }

    #[test]
    fn test_summarize_events() {
        let events = vec![
            event(10, 1, "Explosion"),
            event(10, 1, "Evacuation"),
            event(10, 1, "Lava flow(s)"),
            event(10, 1, "Explosion"),
            event(11, 1, "Tsunami"),
            event(99, 1, "Explosion"),
        ];
        let summaries = summarize_events(
            [EruptionNumber::new(10), EruptionNumber::new(12)],
            &events,
        );
        assert_eq!(summaries.len(), 2);
        let first = &summaries[&EruptionNumber::new(10)];
        assert_eq!(first.event_list(), "Explosion, Lava flow(s), Explosion");
        assert_eq!(first.count, 3);
        assert_eq!(first.severity, 2);
        assert_eq!(summaries[&EruptionNumber::new(12)].count, 0);
    }

    #[test]
    fn test_event_counts_by_volcano() {
        let volcanoes = vec![
            VolcanoRecord::new(VolcanoId::new(1), "Etna"),
            VolcanoRecord::new(VolcanoId::new(2), "Stromboli"),
        ];
        let events = vec![
            event(10, 1, "Explosion"),
            event(11, 1, "Explosion"),
            event(12, 2, "Lava lake"),
        ];
        let counts = event_counts_by_volcano(&volcanoes, &events, &["Explosion", "Lava lake"]);
        assert_eq!(counts[0].counts, vec![2, 0]);
        assert_eq!(counts[1].counts, vec![0, 1]);
        assert_eq!(counts[1].volcano_name, "Stromboli");
    }
}
