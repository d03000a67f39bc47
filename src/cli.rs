use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

mod config;
mod report;
mod terminal;

use anyhow::Context;
use clap::{ArgAction, CommandFactory};
use flightsched::{
    domain::Operator,
    storage::{query_file, snapshot, IngestSummary},
    Config, DatetimeLayouts, FlightStore, Ingest, Matcher, QueryMode, RecordValidator,
};
use report::{OutputFormat, ResponseReport, RunReport};
use tracing::instrument;

/// Configuration file read when `--config` is not given, if it exists.
const DEFAULT_CONFIG: &str = "flights.toml";

#[derive(Debug, clap::Parser)]
#[command(version, about, args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to the configuration file [default: flights.toml, if present]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    process: Process,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        match self.command {
            Some(Command::Config(command)) => {
                let path = self
                    .config
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
                command.run(&path)
            }
            None => {
                let config = load_config(self.config.as_deref())?;
                self.process.run(config)
            }
        }
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Show or create the configuration file
    Config(config::Command),
}

/// Where flights come from and where results go.
#[derive(Debug, clap::Args)]
struct Process {
    /// Parse a single CSV file
    #[arg(short, long, value_name = "FILE", conflicts_with_all = ["directory", "json"])]
    input: Option<PathBuf>,

    /// Parse all CSV files in a directory
    #[arg(short, long, value_name = "DIR", conflicts_with = "json")]
    directory: Option<PathBuf>,

    /// Load an existing JSON database instead of parsing CSV
    #[arg(short, long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Output path for the valid flights JSON
    #[arg(short, long, value_name = "FILE", default_value = "db.json")]
    output: PathBuf,

    /// Query file in JSON format
    #[arg(short, long, value_name = "FILE")]
    query: Option<PathBuf>,

    /// Where to log rejected lines [default: from configuration]
    #[arg(long, value_name = "FILE")]
    errors: Option<PathBuf>,

    /// Accepted timestamp layouts [default: from configuration]
    #[arg(long, value_name = "LAYOUTS")]
    layouts: Option<LayoutsArg>,

    /// How timestamp and price constraints are read [default: from configuration]
    #[arg(long, value_name = "MODE")]
    query_mode: Option<QueryModeArg>,

    /// Operator ID to include in the response filename
    #[arg(long, value_name = "ID", requires = "first_name")]
    operator_id: Option<String>,

    /// Operator first name to include in the response filename
    #[arg(long, value_name = "NAME", requires = "last_name")]
    first_name: Option<String>,

    /// Operator last name to include in the response filename
    #[arg(long, value_name = "NAME", requires = "operator_id")]
    last_name: Option<String>,

    /// Output format for the run summary
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LayoutsArg {
    /// YYYY-MM-DD HHMM or YYYY-MM-DD HH:MM
    Both,
    /// YYYY-MM-DD HHMM only
    Compact,
}

impl From<LayoutsArg> for DatetimeLayouts {
    fn from(arg: LayoutsArg) -> Self {
        match arg {
            LayoutsArg::Both => Self::Both,
            LayoutsArg::Compact => Self::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum QueryModeArg {
    /// Departure and arrival are bounds, price is a maximum
    Range,
    /// Timestamps match by substring, price by equality
    Literal,
}

impl From<QueryModeArg> for QueryMode {
    fn from(arg: QueryModeArg) -> Self {
        match arg {
            QueryModeArg::Range => Self::Range,
            QueryModeArg::Literal => Self::Literal,
        }
    }
}

impl Process {
    #[instrument(level = "debug", skip(self, config))]
    fn run(self, mut config: Config) -> anyhow::Result<()> {
        self.apply_overrides(&mut config);
        let validator = RecordValidator::from_config(&config);

        let mut report = RunReport::default();
        let store = if let Some(input) = &self.input {
            let mut ingest = Ingest::new(validator);
            let summary = ingest.ingest_file(input).unwrap_or_else(|e| {
                tracing::error!("{e}");
                IngestSummary {
                    failed_files: 1,
                    ..IngestSummary::default()
                }
            });
            self.export(ingest, summary, &config, &mut report)?
        } else if let Some(directory) = &self.directory {
            let mut ingest = Ingest::new(validator);
            let summary = ingest.ingest_directory(directory).unwrap_or_else(|e| {
                tracing::error!("{e}");
                IngestSummary::default()
            });
            self.export(ingest, summary, &config, &mut report)?
        } else if let Some(json) = &self.json {
            snapshot::load(json)
                .with_context(|| format!("Error loading JSON file {}", json.display()))?
        } else {
            Cli::command().print_help()?;
            anyhow::bail!("No input given: use --input, --directory or --json");
        };
        report.flights = store.len();

        if let Some(query_path) = &self.query {
            report.response = Some(Self::answer_queries(&store, query_path, &config)?);
        }

        report.print(self.format)
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(errors) = &self.errors {
            config.errors_path.clone_from(errors);
        }
        if let Some(layouts) = self.layouts {
            config.set_datetime_layouts(layouts.into());
        }
        if let Some(mode) = self.query_mode {
            config.set_query_mode(mode.into());
        }
        if let (Some(id), Some(first_name), Some(last_name)) =
            (&self.operator_id, &self.first_name, &self.last_name)
        {
            config.operator = Some(Operator {
                id: id.clone(),
                first_name: first_name.clone(),
                last_name: last_name.clone(),
            });
        }
    }

    /// Write the snapshot and the error log for a CSV run.
    fn export(
        &self,
        ingest: Ingest,
        summary: IngestSummary,
        config: &Config,
        report: &mut RunReport,
    ) -> anyhow::Result<FlightStore> {
        let errors_path = &config.errors_path;
        let file = File::create(errors_path)
            .with_context(|| format!("Failed to create {}", errors_path.display()))?;
        ingest
            .export_errors(BufWriter::new(file))
            .with_context(|| format!("Failed to write {}", errors_path.display()))?;

        let (store, _) = ingest.into_parts();
        snapshot::save(&store, &self.output)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        report.ingest = Some(summary);
        report.snapshot = Some(self.output.clone());
        report.errors = Some(errors_path.clone());
        Ok(store)
    }

    fn answer_queries(
        store: &FlightStore,
        query_path: &Path,
        config: &Config,
    ) -> anyhow::Result<ResponseReport> {
        let queries = query_file::load_queries(query_path)
            .with_context(|| format!("Error executing queries from {}", query_path.display()))?;

        let results = store.run_queries(&queries, &Matcher::from_config(config));

        let path = query_file::response_filename(
            config.operator.as_ref(),
            chrono::Local::now().naive_local(),
        );
        query_file::save_response(&results, &path)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(ResponseReport {
            path,
            queries: results.len(),
            matches: results.iter().map(|result| result.matches.len()).sum(),
        })
    }
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let default = Path::new(DEFAULT_CONFIG);
            if !default.exists() {
                tracing::debug!("No {DEFAULT_CONFIG} found, using default configuration");
                return Ok(Config::default());
            }
            default
        }
    };
    let config = Config::load(path).map_err(|e| anyhow::anyhow!("{e}"))?;
    tracing::info!("Loaded configuration from {}", path.display());
    Ok(config)
}
