// src/telemetry.rs
use std::path::Path;

use tracing::Span;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_FILE_NAME: &str = "carvana_scraper.log";

/// Logging handle passed into every component of a run.
///
/// Components never reach for a global logger; whoever builds the run decides
/// where the lines go.
pub trait Telemetry {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);

    /// Called once when the run is over.
    fn flush(&self) {}
}

/// Emits every line as a `tracing` event inside one span per run.
pub struct TracingTelemetry {
    span: Span,
}

impl TracingTelemetry {
    pub fn new(run_id: &str) -> Self {
        Self {
            span: tracing::info_span!("scrape_run", run_id = %run_id),
        }
    }
}

impl Telemetry for TracingTelemetry {
    fn debug(&self, message: &str) {
        let _entered = self.span.enter();
        tracing::debug!("{message}");
    }

    fn info(&self, message: &str) {
        let _entered = self.span.enter();
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        let _entered = self.span.enter();
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        let _entered = self.span.enter();
        tracing::error!("{message}");
    }

    fn flush(&self) {
        let _entered = self.span.enter();
        tracing::debug!("telemetry flushed");
    }
}

/// Installs the console + file subscriber. Keep the guard alive until exit or
/// the file layer drops buffered lines.
pub fn init_subscriber(log_dir: &Path) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    // One log per run; the appender itself only ever appends.
    let log_path = log_dir.join(LOG_FILE_NAME);
    if log_path.exists() {
        std::fs::remove_file(&log_path)?;
    }
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,carvana_scraper=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_line_number(true)
                .with_writer(file_writer),
        )
        .init();

    Ok(guard)
}
