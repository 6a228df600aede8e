//! Table and JSON rendering for command output.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use serde::Serialize;
use volcano_core::{CorpusSummary, NearbySite};
use volcano_model::{
    EruptionMatch, Oxide, Resolution, SampleRecord, VolcanoId, VolcanoRecord, VolcanoStats,
};
use volcano_resolve::LabelSuggestion;
use volcano_stats::{TimelineRow, TimelineSpan, VolcanoEventCounts, stats_color};

/// One resolved label, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedLabel {
    pub label: String,
    pub resolution: Resolution,
    /// Registry names of the resolved or candidate volcanoes.
    pub volcanoes: Vec<String>,
    /// Display name of the label's alias cluster.
    pub site: Option<String>,
    pub suggestions: Vec<LabelSuggestion>,
}

/// Volcano statistics with derived display fields.
#[derive(Debug, Clone, Serialize)]
pub struct StatsView {
    #[serde(flatten)]
    pub stats: VolcanoStats,
    /// Present registry rocks, most prominent first.
    pub rocks: Vec<&'static str>,
    pub color: String,
}

impl StatsView {
    pub fn new(stats: VolcanoStats) -> Self {
        Self {
            rocks: stats
                .rocks_by_rank()
                .into_iter()
                .map(|rock| rock.as_str())
                .collect(),
            color: stats_color(&stats).hex(),
            stats,
        }
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_wide_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(165);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

fn opt_cell<T: ToString>(value: Option<T>) -> Cell {
    match value {
        Some(value) => Cell::new(value.to_string()),
        None => dim_cell("-"),
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

/// Formats an optional number with fixed decimals, `-` when absent.
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.decimals$}"))
}

pub fn corpus_table(summary: &CorpusSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Item"), header_cell("Count")]);
    apply_table_style(&mut table);
    for (label, count) in summary.rows() {
        table.add_row(vec![Cell::new(label), Cell::new(count)]);
    }
    align_column(&mut table, 1, CellAlignment::Right);
    table
}

pub fn volcano_table<'a>(volcanoes: impl IntoIterator<Item = &'a VolcanoRecord>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Number"),
        header_cell("Volcano"),
        header_cell("Country"),
        header_cell("Setting"),
        header_cell("Type"),
        header_cell("Shape"),
        header_cell("Lat"),
        header_cell("Lon"),
    ]);
    apply_wide_table_style(&mut table);
    for volcano in volcanoes {
        table.add_row(vec![
            Cell::new(volcano.id),
            Cell::new(&volcano.name),
            Cell::new(&volcano.country),
            Cell::new(&volcano.tectonic_setting),
            Cell::new(&volcano.primary_type),
            opt_cell(volcano.primary_shape_code()),
            Cell::new(format_number(volcano.latitude, 3)),
            Cell::new(format_number(volcano.longitude, 3)),
        ]);
    }
    align_column(&mut table, 6, CellAlignment::Right);
    align_column(&mut table, 7, CellAlignment::Right);
    table
}

fn status_cell(resolution: &Resolution) -> Cell {
    match resolution {
        Resolution::Resolved(_) => Cell::new("resolved").fg(Color::Green),
        Resolution::Ambiguous(_) => Cell::new("ambiguous").fg(Color::Yellow),
        Resolution::Unresolved => Cell::new("unresolved").fg(Color::Red),
    }
}

/// Volcanoes named by a resolution, candidates included.
pub fn resolution_ids(resolution: &Resolution) -> Vec<VolcanoId> {
    match resolution {
        Resolution::Resolved(id) => vec![*id],
        Resolution::Ambiguous(ids) => ids.clone(),
        Resolution::Unresolved => Vec::new(),
    }
}

pub fn resolution_table(rows: &[ResolvedLabel]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Label"),
        header_cell("Status"),
        header_cell("Volcano"),
        header_cell("Number"),
        header_cell("Site"),
        header_cell("Suggestions"),
    ]);
    apply_table_style(&mut table);
    for row in rows {
        let ids = resolution_ids(&row.resolution)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let suggestions = row
            .suggestions
            .iter()
            .map(|s| format!("{} ({:.2})", s.label, s.score))
            .collect::<Vec<_>>()
            .join("; ");
        table.add_row(vec![
            Cell::new(&row.label),
            status_cell(&row.resolution),
            Cell::new(row.volcanoes.join(", ")),
            Cell::new(ids),
            opt_cell(row.site.as_deref()),
            if suggestions.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(suggestions)
            },
        ]);
    }
    table
}

pub fn stats_table(view: &StatsView) -> Table {
    let stats = &view.stats;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    let rows: Vec<(&str, String)> = vec![
        ("Volcano", stats.volcano_name.clone()),
        ("Number", stats.volcano_id.to_string()),
        ("Eruptions", stats.eruption_count.to_string()),
        ("With VEI", stats.vei_count.to_string()),
        ("Reliability", format_number(Some(stats.reliability), 2)),
        ("Max VEI", format_number(stats.max_vei, 0)),
        ("Mean VEI", format_number(stats.mean_vei, 2)),
        ("Min VEI", format_number(stats.min_vei, 0)),
        ("Rocks", view.rocks.join(", ")),
        ("Colour", view.color.clone()),
    ];
    for (field, value) in rows {
        table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), Cell::new(value)]);
    }
    table
}

pub fn samples_table<'a>(samples: impl IntoIterator<Item = &'a SampleRecord>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sample"),
        header_cell("Location"),
        header_cell("Material"),
        header_cell("Rock"),
        header_cell("Date"),
        header_cell("SiO2"),
        header_cell("Na2O+K2O"),
        header_cell("Issues"),
    ]);
    apply_wide_table_style(&mut table);
    for sample in samples {
        let date = sample
            .explicit_date_label()
            .or_else(|| sample.inferred_year.map(|year| format!("{year}*")));
        let silica = sample
            .normalized
            .as_ref()
            .and_then(|normalized| normalized.get(Oxide::SiO2));
        let alkali = sample
            .normalized
            .as_ref()
            .map(|normalized| normalized.total_alkali());
        let issues = sample
            .issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        table.add_row(vec![
            Cell::new(&sample.sample_name),
            Cell::new(&sample.location),
            Cell::new(sample.material),
            opt_cell(sample.rock),
            opt_cell(date),
            Cell::new(format_number(silica, 2)),
            Cell::new(format_number(alkali, 2)),
            if issues.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(issues).fg(Color::Yellow)
            },
        ]);
    }
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    table
}

pub fn eruption_match_table(matches: &[(i32, EruptionMatch<'_>)]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Sample year"),
        header_cell("Match"),
        header_cell("Eruption"),
        header_cell("Start"),
        header_cell("End"),
        header_cell("VEI"),
    ]);
    apply_table_style(&mut table);
    for (year, found) in matches {
        let kind = match found {
            EruptionMatch::Exact(_) => Cell::new("exact").fg(Color::Green),
            EruptionMatch::Spanning(_) => Cell::new("spanning").fg(Color::Yellow),
            EruptionMatch::NotFound => dim_cell("none"),
        };
        let eruption = found.eruption();
        table.add_row(vec![
            Cell::new(year),
            kind,
            opt_cell(eruption.map(|e| e.eruption_number)),
            opt_cell(eruption.map(|e| e.recorded_start())),
            opt_cell(eruption.map(|e| e.recorded_end())),
            opt_cell(eruption.and_then(|e| e.vei)),
        ]);
    }
    table
}

fn span_text(span: &TimelineSpan) -> (String, String) {
    match span {
        TimelineSpan::Dated { start, end } => (
            format!("{}-{:02}-{:02}", start.year, start.month, start.day),
            format!("{}-{:02}-{:02}", end.year, end.month, end.day),
        ),
        TimelineSpan::Years {
            start_year,
            end_year,
            bce,
        } => {
            let suffix = if *bce { " BCE" } else { "" };
            (format!("{start_year}{suffix}"), end_year.to_string())
        }
    }
}

pub fn timeline_table<'a>(rows: impl IntoIterator<Item = &'a TimelineRow>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Volcano"),
        header_cell("Eruption"),
        header_cell("Start"),
        header_cell("End"),
        header_cell("Recorded"),
        header_cell("VEI"),
        header_cell("Severity"),
        header_cell("Events"),
    ]);
    apply_wide_table_style(&mut table);
    for row in rows {
        let (start, end) = span_text(&row.span);
        let vei = if row.vei_recorded {
            Cell::new(row.vei)
        } else {
            dim_cell(format!("{}*", row.vei))
        };
        table.add_row(vec![
            Cell::new(&row.volcano_name),
            Cell::new(row.eruption_number),
            Cell::new(start),
            Cell::new(end),
            dim_cell(format!("{} / {}", row.recorded_start, row.recorded_end)),
            vei,
            Cell::new(row.events.severity),
            Cell::new(row.events.event_list()),
        ]);
    }
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    table
}

pub fn nearby_table<'a>(sites: impl IntoIterator<Item = &'a NearbySite>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Volcanoes"),
        header_cell("Location"),
        header_cell("Latitude"),
        header_cell("Longitude"),
        header_cell("Source"),
        header_cell("Samples"),
    ]);
    apply_wide_table_style(&mut table);
    for site in sites {
        table.add_row(vec![
            Cell::new(&site.volcanoes),
            Cell::new(&site.location),
            Cell::new(format!("{} .. {}", site.latitude_min, site.latitude_max)),
            Cell::new(format!("{} .. {}", site.longitude_min, site.longitude_max)),
            Cell::new(&site.source_file),
            Cell::new(&site.sample_names),
        ]);
    }
    table
}

pub fn event_counts_table(event_types: &[&str], counts: &[VolcanoEventCounts]) -> Table {
    let mut table = Table::new();
    let mut header = vec![header_cell("Event")];
    header.extend(counts.iter().map(|row| header_cell(&row.volcano_name)));
    table.set_header(header);
    apply_table_style(&mut table);
    for (index, event_type) in event_types.iter().enumerate() {
        let mut cells = vec![Cell::new(event_type)];
        cells.extend(counts.iter().map(|row| {
            let count = row.counts.get(index).copied().unwrap_or_default();
            if count == 0 {
                dim_cell(count)
            } else {
                Cell::new(count)
            }
        }));
        table.add_row(cells);
    }
    for column in 1..=counts.len() {
        align_column(&mut table, column, CellAlignment::Right);
    }
    table
}
