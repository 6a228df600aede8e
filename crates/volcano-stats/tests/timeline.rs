//! Aggregates and chronogram rows for one volcano.

use volcano_model::{
    EruptionCategory, EruptionNumber, EruptionRecord, EventRecord, RegistryRock, VolcanoId,
    VolcanoRecord,
};
use volcano_stats::{TimelineSpan, aggregate, build_timeline, stats_color};

const ETNA: VolcanoId = VolcanoId::new(211060);

fn eruption(
    number: u32,
    start: (i32, Option<u32>),
    end_year: Option<i32>,
    vei: Option<u8>,
) -> EruptionRecord {
    let mut record = EruptionRecord::new(EruptionNumber::new(number), ETNA);
    record.volcano_name = "Etna".to_string();
    record.start_year = Some(start.0);
    record.start_month = start.1;
    record.end_year = end_year;
    record.vei = vei;
    record
}

fn eruptions() -> Vec<EruptionRecord> {
    let mut uncertain = eruption(5, (1971, None), None, None);
    uncertain.category = EruptionCategory::Uncertain;
    vec![
        eruption(1, (2021, Some(2)), Some(2021), None),
        eruption(2, (2001, Some(7)), Some(2001), Some(3)),
        eruption(3, (1983, Some(11)), None, None),
        eruption(4, (1669, Some(3)), Some(1669), Some(3)),
        uncertain,
        eruption(6, (-1500, None), None, Some(5)),
    ]
}

fn event(number: u32, event_type: &str) -> EventRecord {
    EventRecord {
        eruption_number: EruptionNumber::new(number),
        volcano_id: ETNA,
        volcano_name: "Etna".to_string(),
        event_type: event_type.to_string(),
    }
}

#[test]
fn timeline_rows() {
    let all = eruptions();
    let refs: Vec<&EruptionRecord> = all.iter().collect();
    let events = vec![
        event(1, "Lava fountains"),
        event(1, "Explosion"),
        event(1, "Ash"),
        event(2, "Lava flow(s)"),
    ];
    let timeline = build_timeline(&refs, &events);

    let rendered = timeline
        .modern
        .iter()
        .chain(&timeline.early)
        .map(|row| {
            let span = match row.span {
                TimelineSpan::Dated { start, end } => format!(
                    "{}-{:02}-{:02}..{}-{:02}-{:02}",
                    start.year, start.month, start.day, end.year, end.month, end.day
                ),
                TimelineSpan::Years {
                    start_year,
                    end_year,
                    bce,
                } => format!("{start_year}..{end_year}{}", if bce { " BCE" } else { "" }),
            };
            format!(
                "{} | {span} | vei {}{} | {} | {}",
                row.eruption_number,
                row.vei,
                if row.vei_recorded { "" } else { "*" },
                row.events.severity,
                if row.events.count == 0 {
                    "-".to_string()
                } else {
                    row.events.event_list()
                }
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    1 | 2021-02-01..2021-05-28 | vei 3* | 1 | Lava fountains, Explosion
    2 | 2001-07-01..2001-10-28 | vei 3 | 1 | Lava flow(s)
    3 | 1983-11-01..1984-11-28 | vei 2* | 1 | -
    5 | 1971-06-01..1971-09-28 | vei 2* | 1 | -
    4 | 1669..1669 | vei 3 | 1 | -
    6 | -1500..-1500 BCE | vei 5 | 1 | -
    ");
}

#[test]
fn aggregate_and_color() {
    let mut volcano = VolcanoRecord::new(ETNA, "Etna");
    volcano.rock_slots[0] = Some(RegistryRock::TrachybasaltTephriteBasanite);
    volcano.rock_slots[1] = Some(RegistryRock::BasaltPicroBasalt);
    let all = eruptions();
    let stats = aggregate(&volcano, &all);

    assert_eq!(stats.eruption_count, 6);
    assert_eq!(stats.vei_count, 3);
    assert!((stats.reliability - 0.5).abs() < 1e-12);
    assert_eq!(stats.max_vei, Some(5.0));
    assert_eq!(stats.min_vei, Some(3.0));
    assert_eq!(stats_color(&stats).to_string(), "rgb(0,0,229)");
}
