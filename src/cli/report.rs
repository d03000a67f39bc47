use std::path::PathBuf;

use flightsched::storage::IngestSummary;
use serde_json::json;

use super::terminal::Paint;

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// What a single run did, for display.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Set when CSV input was ingested.
    pub ingest: Option<IngestSummary>,
    /// Flights held once input was loaded.
    pub flights: usize,
    pub snapshot: Option<PathBuf>,
    pub errors: Option<PathBuf>,
    pub response: Option<ResponseReport>,
}

#[derive(Debug)]
pub struct ResponseReport {
    pub path: PathBuf,
    pub queries: usize,
    pub matches: usize,
}

impl RunReport {
    pub fn print(&self, format: OutputFormat) -> anyhow::Result<()> {
        match format {
            OutputFormat::Text => {
                self.print_text();
                Ok(())
            }
            OutputFormat::Json => self.print_json(),
        }
    }

    fn print_text(&self) {
        if let Some(summary) = &self.ingest {
            println!("{}", format!("✓ Accepted:  {}", summary.accepted).accepted());
            let rejected = format!("✗ Rejected:  {}", summary.rejected);
            if summary.rejected == 0 {
                println!("{}", rejected.hint());
            } else {
                println!("{}", rejected.rejected());
            }
            if summary.skipped > 0 {
                println!("{}", format!("  Comments:  {}", summary.skipped).hint());
            }
            if summary.failed_files > 0 {
                println!(
                    "{}",
                    format!("✗ Unreadable files: {}", summary.failed_files).rejected()
                );
            }
        } else {
            println!("Loaded {} flights", self.flights);
        }

        if let Some(path) = &self.snapshot {
            println!("Valid flights saved to {}", path.display().path());
        }
        if let Some(path) = &self.errors {
            println!("Error log saved to {}", path.display().path());
        }
        if let Some(response) = &self.response {
            println!(
                "Query results saved to {} {}",
                response.path.display().path(),
                format!(
                    "({} queries, {} matches)",
                    response.queries, response.matches
                )
                .hint()
            );
        }

        println!("Processing complete.");
    }

    fn print_json(&self) -> anyhow::Result<()> {
        let output = json!({
            "flights": self.flights,
            "ingest": self.ingest.map(|summary| json!({
                "accepted": summary.accepted,
                "rejected": summary.rejected,
                "skipped": summary.skipped,
                "failed_files": summary.failed_files,
            })),
            "snapshot": self.snapshot,
            "errors": self.errors,
            "response": self.response.as_ref().map(|response| json!({
                "path": response.path,
                "queries": response.queries,
                "matches": response.matches,
            })),
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}
