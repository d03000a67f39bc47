use std::path::Path;

use flightsched::Config;
use tracing::instrument;

use crate::cli::terminal::Paint;

#[derive(Debug, clap::Parser)]
/// Show or create the configuration file
///
/// Configuration is read from flights.toml in the working directory (or the
/// file given with --config) and controls how flights are validated and
/// queried.
///
/// Available configuration keys:
///   `origin_codes`      Airport codes flights may depart from
///   `datetime_layouts`  "both" (HHMM and HH:MM) or "compact" (HHMM only)
///   `query_mode`        "range" (bounds) or "literal" (substring / equality)
///   `errors_path`       Where rejected lines are logged (default: errors.txt)
///   operator          Table with id, `first_name`, `last_name` used to name
///                     query responses
pub struct Command {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Debug, clap::Parser)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write the default configuration to the config path
    Init,
}

impl Command {
    #[instrument]
    pub fn run(self, config_path: &Path) -> anyhow::Result<()> {
        match self.command {
            ConfigCommand::Show => Self::show_config(config_path),
            ConfigCommand::Init => Self::init_config(config_path),
        }
    }

    fn show_config(config_path: &Path) -> anyhow::Result<()> {
        let config = if config_path.exists() {
            Config::load(config_path).map_err(|e| anyhow::anyhow!("{e}"))?
        } else {
            Config::default()
        };

        println!(
            "Configuration: {}",
            if config_path.exists() {
                config_path.display().path()
            } else {
                "(defaults)".hint()
            }
        );
        println!("  origin_codes: {}", config.origin_codes().join(", "));
        println!(
            "  datetime_layouts: {:?} ({})",
            config.datetime_layouts(),
            match config.datetime_layouts() {
                flightsched::DatetimeLayouts::Both => "YYYY-MM-DD HHMM or YYYY-MM-DD HH:MM",
                flightsched::DatetimeLayouts::Compact => "YYYY-MM-DD HHMM only",
            }
            .hint()
        );
        println!(
            "  query_mode: {:?} ({})",
            config.query_mode(),
            match config.query_mode() {
                flightsched::QueryMode::Range => "departs at or after, arrives by, costs at most",
                flightsched::QueryMode::Literal => "timestamp substring, price equality",
            }
            .hint()
        );
        println!("  errors_path: {}", config.errors_path.display());
        match &config.operator {
            Some(operator) => println!(
                "  operator: {} {} ({})",
                operator.first_name, operator.last_name, operator.id
            ),
            None => println!("  operator: {}", "none (responses go to response.json)".hint()),
        }
        Ok(())
    }

    fn init_config(config_path: &Path) -> anyhow::Result<()> {
        if config_path.exists() {
            anyhow::bail!(
                "Configuration already exists at {}",
                config_path.display()
            );
        }

        Config::default()
            .save(config_path)
            .map_err(|e| anyhow::anyhow!("{e}"))?;

        println!(
            "{}",
            format!("Created {}", config_path.display()).accepted()
        );
        Ok(())
    }
}
