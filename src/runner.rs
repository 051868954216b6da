// src/runner.rs
use chrono::{DateTime, Utc};

use crate::browser::{InteractionController, PageSession};
use crate::config::Config;
use crate::domain::ResultSet;
use crate::errors::ScrapeError;
use crate::scraper::{PageExtractor, PaginationLimits, PaginationSummary, Paginator};
use crate::search::{FilterApplier, FilterSet, LocationSetter};
use crate::spreadsheets::{PersistOutcome, ResultWriter};
use crate::telemetry::Telemetry;

#[derive(Debug)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub filters_applied: usize,
    pub pagination: PaginationSummary,
    pub outcome: PersistOutcome,
}

/// Search, filter, page through every result and save what was found.
///
/// The session must be freshly opened; the run navigates it to the search page
/// itself.
pub fn execute_scrape(
    config: &Config,
    filters: &FilterSet,
    session: &dyn PageSession,
    telemetry: &dyn Telemetry,
) -> Result<RunReport, ScrapeError> {
    let started_at = Utc::now();
    let site = &config.site;

    let controller =
        InteractionController::new(session, telemetry, config.wait_timeout, config.settle);
    let extractor = PageExtractor::new(site, config.monthly_payment_mode, telemetry)?;
    let paginator = Paginator::new(
        session,
        &controller,
        &extractor,
        telemetry,
        site,
        PaginationLimits {
            max_pages: config.max_pages,
            stall_limit: config.stall_limit,
        },
    )?;
    let writer = ResultWriter::new(&config.output_dir, config.tabular_format, telemetry);

    // Set Search Location
    telemetry.info(&format!("Opening {}", site.search_url));
    session.navigate(&site.search_url)?;
    if let Some(zip_code) = &config.zip_code {
        LocationSetter::new(&controller, site, telemetry)
            .set_zip(zip_code)
            .map_err(|e| {
                telemetry.error(&format!("Setting location failed at {}", e.locator()));
                e
            })?;
    }

    // Applying Filters
    if filters.is_empty() {
        telemetry.warn("No filter values given, scraping the unfiltered results");
    }
    let filters_applied = FilterApplier::new(&controller, site, telemetry)
        .apply(filters)
        .map_err(|e| {
            telemetry.error(&format!("Applying filters failed at {}", e.locator()));
            e
        })?;

    let mut results = ResultSet::new();
    let pagination = match paginator.run(&mut results) {
        Ok(summary) => summary,
        Err(e) => {
            telemetry.error(&format!("Pagination aborted: {e}"));
            if config.persist_on_abort && !results.is_empty() {
                match writer.persist(&results) {
                    Ok(outcome) => telemetry.warn(&format!(
                        "Saved {} partial records to {}",
                        outcome.records,
                        outcome.path.display()
                    )),
                    Err(write_err) => {
                        telemetry.error(&format!("Could not save partial results: {write_err}"))
                    }
                }
            }
            return Err(e.into());
        }
    };

    telemetry.info(&format!(
        "Collected {} records over {} pages ({} tiles skipped)",
        pagination.records, pagination.pages, pagination.skipped_tiles
    ));

    // Saving Data
    telemetry.info("Saving data");
    let outcome = writer.persist(&results)?;

    Ok(RunReport {
        started_at,
        finished_at: Utc::now(),
        filters_applied,
        pagination,
        outcome,
    })
}
