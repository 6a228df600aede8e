use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, info_span, warn};

use volcano_cli::summary::{
    ResolvedLabel, StatsView, apply_table_style, corpus_table, eruption_match_table,
    event_counts_table, nearby_table, resolution_ids, resolution_table, samples_table,
    stats_table, timeline_table, volcano_table,
};
use volcano_core::{ContextOptions, VolcanoContext};
use volcano_ingest::{RegistryFilter, RegistryOptions};
use volcano_model::{EruptionMatch, EruptionNumber, SampleRecord};
use volcano_stats::{ERUPTIVE_EVENTS, Timeline, event_counts_by_volcano};
use volcano_transform::{
    ChemAnomaly, SampleDate, classify, date_catalogue, detect_anomalies, extract_year,
    filter_by_date,
};

use crate::cli::{
    ClassifyArgs, DataArgs, EventsArgs, ExtractYearArgs, NearbyArgs, ResolveArgs, SamplesArgs,
    StatsArgs, TimelineArgs, VolcanoesArgs,
};

pub fn load_context(data: &DataArgs) -> Result<VolcanoContext> {
    let registry = RegistryOptions::new().with_confirmed_only(!data.all_eruptions);
    let mut options = ContextOptions::new(&data.data_dir).with_registry_options(registry);
    if let Some(path) = &data.overrides {
        options = options.with_overrides_path(path);
    }
    VolcanoContext::load(options)
        .with_context(|| format!("load data directory {}", data.data_dir.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{text}");
    Ok(())
}

pub fn run_summary(context: &VolcanoContext) -> Result<()> {
    let summary = context.summary().context("count archive files")?;
    println!("{}", corpus_table(&summary));
    Ok(())
}

pub fn run_volcanoes(context: &VolcanoContext, args: &VolcanoesArgs) -> Result<()> {
    let filter = args.settings.iter().fold(
        RegistryFilter::new()
            .with_country(args.country.as_str())
            .with_eruptions_only(args.with_eruptions),
        |filter, setting| filter.with_tectonic_setting(setting.as_str()),
    );
    let volcanoes = context.registry().filter(&filter);
    info!(matched = volcanoes.len(), "registry filtered");
    println!("{}", volcano_table(volcanoes));
    Ok(())
}

pub fn run_resolve(context: &VolcanoContext, args: &ResolveArgs) -> Result<()> {
    let registry = context.registry();
    let resolver = context.resolver();
    let rows: Vec<ResolvedLabel> = args
        .labels
        .iter()
        .map(|label| {
            let resolution = context.resolve(label);
            let ids = resolution_ids(&resolution);
            let suggestions = if resolution.is_resolved() {
                Vec::new()
            } else {
                resolver.suggest(label, args.suggestions)
            };
            ResolvedLabel {
                label: label.clone(),
                volcanoes: ids
                    .iter()
                    .filter_map(|id| registry.volcano(*id))
                    .map(|volcano| volcano.name.clone())
                    .collect(),
                site: resolver
                    .cluster(label)
                    .and_then(|cluster| resolver.display_name(cluster))
                    .map(str::to_string),
                resolution,
                suggestions,
            }
        })
        .collect();
    let unresolved = rows
        .iter()
        .filter(|row| !row.resolution.is_resolved())
        .count();
    if unresolved > 0 {
        warn!(unresolved, "labels not resolved to a single volcano");
    }
    println!("{}", resolution_table(&rows));
    Ok(())
}

pub fn run_stats(context: &VolcanoContext, args: &StatsArgs) -> Result<()> {
    let volcano = context.volcano(&args.volcano)?;
    let view = StatsView::new(context.stats(volcano));
    if args.json {
        return print_json(&view);
    }
    println!("{}", stats_table(&view));
    Ok(())
}

#[derive(Serialize)]
struct MatchRow {
    year: i32,
    #[serde(rename = "match")]
    kind: &'static str,
    eruption_number: Option<EruptionNumber>,
}

#[derive(Serialize)]
struct AnomalyRow<'a> {
    sample: &'a str,
    anomaly: ChemAnomaly,
}

#[derive(Serialize)]
struct SamplesReport<'a> {
    key: &'a str,
    dates: Vec<String>,
    samples: &'a [SampleRecord],
    anomalies: Vec<AnomalyRow<'a>>,
    eruption_matches: Vec<MatchRow>,
}

fn match_kind(found: &EruptionMatch<'_>) -> &'static str {
    match found {
        EruptionMatch::Exact(_) => "exact",
        EruptionMatch::Spanning(_) => "spanning",
        EruptionMatch::NotFound => "none",
    }
}

pub fn run_samples(context: &VolcanoContext, args: &SamplesArgs) -> Result<()> {
    let span = info_span!("samples", key = %args.volcano);
    let _guard = span.enter();
    let loaded = context.samples(&args.volcano)?;
    let samples: Vec<SampleRecord> = match &args.date {
        Some(text) => {
            let date: SampleDate = text
                .parse()
                .with_context(|| format!("invalid --date value {text:?}"))?;
            filter_by_date(&loaded, &date).into_iter().cloned().collect()
        }
        None => loaded.to_vec(),
    };
    info!(loaded = loaded.len(), shown = samples.len(), "samples selected");

    let anomalies: Vec<AnomalyRow<'_>> = detect_anomalies(&samples)
        .into_iter()
        .filter(|(_, anomaly)| *anomaly != ChemAnomaly::NONE)
        .filter_map(|(index, anomaly)| {
            samples.get(index).map(|sample| AnomalyRow {
                sample: &sample.sample_name,
                anomaly,
            })
        })
        .collect();
    let matches = match context.volcano(&args.volcano) {
        Ok(volcano) => context.eruption_matches(volcano, &samples),
        Err(error) => {
            info!(%error, "no single registry volcano; eruption matching skipped");
            Vec::new()
        }
    };
    let dates: Vec<String> = date_catalogue(&loaded)
        .iter()
        .map(ToString::to_string)
        .collect();

    if args.json {
        return print_json(&SamplesReport {
            key: &args.volcano,
            dates,
            samples: &samples,
            anomalies,
            eruption_matches: matches
                .iter()
                .map(|(year, found)| MatchRow {
                    year: *year,
                    kind: match_kind(found),
                    eruption_number: found.eruption().map(|eruption| eruption.eruption_number),
                })
                .collect(),
        });
    }

    if samples.is_empty() {
        println!("No samples for {}.", args.volcano);
        return Ok(());
    }
    println!("{}", samples_table(&samples));
    if !dates.is_empty() {
        println!("Dates: {}", dates.join(", "));
    }
    if !anomalies.is_empty() {
        let mut table = comfy_table::Table::new();
        table.set_header(vec!["Sample", "Anomaly"]);
        apply_table_style(&mut table);
        for row in &anomalies {
            table.add_row(vec![row.sample.to_string(), row.anomaly.to_string()]);
        }
        println!("{table}");
    }
    if !matches.is_empty() {
        println!("{}", eruption_match_table(&matches));
    }
    Ok(())
}

pub fn run_classify(args: &ClassifyArgs) -> Result<()> {
    let rock = classify(args.sio2, args.na2o, args.k2o);
    println!("{rock}");
    Ok(())
}

pub fn run_extract_year(args: &ExtractYearArgs) -> Result<()> {
    match extract_year(&args.text) {
        Some(year) => println!("{year}"),
        None => bail!("no year found in {:?}", args.text),
    }
    Ok(())
}

#[derive(Serialize)]
struct TimelineView {
    volcano: String,
    timeline: Timeline,
}

pub fn run_timeline(context: &VolcanoContext, args: &TimelineArgs) -> Result<()> {
    let mut views = Vec::with_capacity(args.volcanoes.len());
    for key in &args.volcanoes {
        let volcano = context.volcano(key)?;
        views.push(TimelineView {
            volcano: volcano.name.clone(),
            timeline: context.timeline(volcano),
        });
    }
    if args.json {
        return print_json(&views);
    }
    let rows = views
        .iter()
        .flat_map(|view| view.timeline.modern.iter().chain(&view.timeline.early));
    println!("{}", timeline_table(rows));
    Ok(())
}

pub fn run_events(context: &VolcanoContext, args: &EventsArgs) -> Result<()> {
    let volcanoes = args
        .volcanoes
        .iter()
        .map(|key| context.volcano(key))
        .collect::<Result<Vec<_>, _>>()?;
    let event_types: Vec<&str> = if args.event_types.is_empty() {
        ERUPTIVE_EVENTS.to_vec()
    } else {
        args.event_types.iter().map(String::as_str).collect()
    };
    let counts = event_counts_by_volcano(volcanoes, context.registry().events(), &event_types);
    println!("{}", event_counts_table(&event_types, &counts));
    Ok(())
}

pub fn run_nearby(context: &VolcanoContext, args: &NearbyArgs) -> Result<()> {
    let index = context
        .nearby_index(args.rebuild)
        .context("build nearby-sample index")?;
    let state = if index.rebuilt { "rebuilt" } else { "current" };
    println!(
        "Nearby index {state}: {} sites, fingerprint {}",
        index.sites.len(),
        index.fingerprint
    );
    match &args.volcano {
        Some(key) => {
            let volcano = context.volcano(key)?;
            println!("{}", nearby_table(index.sites_near(&volcano.name)));
        }
        None => println!("{}", nearby_table(&index.sites)),
    }
    Ok(())
}
