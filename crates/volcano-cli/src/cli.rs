//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "volcano",
    version,
    about = "Query the volcano registry and the rock-sample archive by volcano",
    long_about = "Query the volcano registry and the rock-sample archive by volcano.\n\n\
                  Archive labels are resolved to registry volcanoes through the alias\n\
                  mapping files; samples are normalized, TAS-classified, and dated."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub data: DataArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Args)]
pub struct DataArgs {
    /// Directory holding the registry tables, mapping files, and archive dataset.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "data", global = true)]
    pub data_dir: PathBuf,

    /// Override table replacing the embedded one.
    #[arg(long = "overrides", value_name = "PATH", global = true)]
    pub overrides: Option<PathBuf>,

    /// Keep uncertain and discredited eruptions.
    #[arg(long = "all-eruptions", global = true)]
    pub all_eruptions: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Count volcanoes, eruptions, alias clusters, and archive files.
    Summary,

    /// List registry volcanoes by country and tectonic setting.
    Volcanoes(VolcanoesArgs),

    /// Resolve archive labels to registry volcanoes.
    Resolve(ResolveArgs),

    /// VEI statistics and rock composition of a volcano.
    Stats(StatsArgs),

    /// Classified archive samples of a volcano.
    Samples(SamplesArgs),

    /// TAS rock name for a chemistry point (wt%).
    Classify(ClassifyArgs),

    /// Find an eruption year in a location comment.
    ExtractYear(ExtractYearArgs),

    /// Eruption timeline rows for one or more volcanoes.
    Timeline(TimelineArgs),

    /// Event type counts per volcano.
    Events(EventsArgs),

    /// Build or reuse the nearby-sample index.
    Nearby(NearbyArgs),
}

#[derive(Args)]
pub struct VolcanoesArgs {
    /// Country to keep (`all` keeps every country).
    #[arg(long = "country", value_name = "COUNTRY", default_value = "all")]
    pub country: String,

    /// Tectonic setting to keep; repeatable.
    #[arg(long = "setting", value_name = "SETTING")]
    pub settings: Vec<String>,

    /// Only volcanoes with at least one kept eruption.
    #[arg(long = "with-eruptions")]
    pub with_eruptions: bool,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Archive labels, composite keys, or display names.
    #[arg(value_name = "LABEL", required = true)]
    pub labels: Vec<String>,

    /// Suggestions shown for unresolved labels.
    #[arg(long = "suggestions", default_value_t = 3)]
    pub suggestions: usize,
}

#[derive(Args)]
pub struct StatsArgs {
    /// Registry name, volcano number, or archive label.
    #[arg(value_name = "VOLCANO")]
    pub volcano: String,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct SamplesArgs {
    /// Registry name, volcano number, archive label, or site display name.
    #[arg(value_name = "VOLCANO")]
    pub volcano: String,

    /// Keep samples with this explicit date (`Y`, `Y-M`, or `Y-M-D`).
    #[arg(long = "date", value_name = "DATE")]
    pub date: Option<String>,

    /// Print JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct ClassifyArgs {
    #[arg(value_name = "SIO2", allow_negative_numbers = true)]
    pub sio2: f64,

    #[arg(value_name = "NA2O", allow_negative_numbers = true)]
    pub na2o: f64,

    #[arg(value_name = "K2O", allow_negative_numbers = true)]
    pub k2o: f64,
}

#[derive(Args)]
pub struct ExtractYearArgs {
    #[arg(value_name = "TEXT")]
    pub text: String,
}

#[derive(Args)]
pub struct TimelineArgs {
    #[arg(value_name = "VOLCANO", required = true)]
    pub volcanoes: Vec<String>,

    /// Print JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct EventsArgs {
    #[arg(value_name = "VOLCANO", required = true)]
    pub volcanoes: Vec<String>,

    /// Event type to count; repeatable. Defaults to the eruptive event types.
    #[arg(long = "type", value_name = "EVENT")]
    pub event_types: Vec<String>,
}

#[derive(Args)]
pub struct NearbyArgs {
    /// Rebuild even when the stored index is current.
    #[arg(long = "rebuild")]
    pub rebuild: bool,

    /// Only list sites near this registry volcano.
    #[arg(long = "volcano", value_name = "NAME")]
    pub volcano: Option<String>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
