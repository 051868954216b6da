use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;

use crate::browser::{BrowserOptions, ChromeSession};
use crate::config::{Config, TabularFormat};
use crate::errors::ScrapeError;
use crate::runner::RunReport;
use crate::scraper::Termination;
use crate::search::FilterSet;
use crate::telemetry::{Telemetry, TracingTelemetry};

mod browser;
mod config;
mod domain;
mod errors;
mod runner;
mod scraper;
mod search;
mod spreadsheets;
mod telemetry;

#[cfg(test)]
mod tests;

/// Scrape vehicle listings from the carvana.com search results.
#[derive(Debug, Parser)]
#[command(name = "carvana_scraper", version)]
struct Cli {
    /// ZIP code to search around
    #[arg(short = 'z', long = "zip")]
    zip: Option<String>,

    /// Keep the geolocated search area instead of entering a ZIP code
    #[arg(long, conflicts_with = "zip")]
    no_location: bool,

    /// JSON file of filter category -> values
    #[arg(short, long)]
    filters: Option<PathBuf>,

    /// Directory the results are written to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Spreadsheet format used when the results are rectangular (csv or xlsx)
    #[arg(long)]
    format: Option<TabularFormat>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(zip) = self.zip {
            config.zip_code = Some(zip);
        }
        if self.no_location {
            config.zip_code = None;
        }
        if let Some(filters) = self.filters {
            config.filters_path = filters;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(format) = self.format {
            config.tabular_format = format;
        }
        if self.headed {
            config.headless = false;
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => cli.apply(config),
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let guard = match telemetry::init_subscriber(&config.log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("❌ Could not open log directory {}: {e}", config.log_dir.display());
            std::process::exit(1);
        }
    };

    let run_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();
    let telemetry = TracingTelemetry::new(&run_id);

    let result = run(&config, &telemetry);
    telemetry.flush();

    let code = match result {
        Ok(report) => {
            tracing::info!(
                records = report.pagination.records,
                pages = report.pagination.pages,
                filters = report.filters_applied,
                elapsed_secs = (report.finished_at - report.started_at).num_seconds(),
                fell_back = report.outcome.fell_back(),
                page_cap = report.pagination.termination == Termination::PageCap,
                "✅ Scrape complete, results in {}",
                report.outcome.path.display()
            );
            0
        }
        Err(e) => {
            tracing::error!("Scrape failed: {e}");
            1
        }
    };

    // Flush the file layer before exiting.
    drop(guard);
    std::process::exit(code);
}

fn run(config: &Config, telemetry: &dyn Telemetry) -> Result<RunReport, ScrapeError> {
    let filters = FilterSet::load(&config.filters_path)?;
    let session = ChromeSession::launch(&BrowserOptions {
        headless: config.headless,
        ..BrowserOptions::default()
    })?;

    runner::execute_scrape(config, &filters, &session, telemetry)
}
