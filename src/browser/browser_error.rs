// src/browser/browser_error.rs
use thiserror::Error;

/// Failures reported by a `PageSession` for a single wait-and-act call.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("timed out waiting for {xpath}: {detail}")]
    Timeout { xpath: String, detail: String },

    #[error("browser error: {0}")]
    Browser(String),
}

/// Fatal failures surfaced by the `InteractionController`.
#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("{action} on {locator} timed out after {attempts} attempts")]
    Timeout {
        action: &'static str,
        locator: String,
        attempts: u32,
    },

    #[error("{action} on {locator} failed: {source}")]
    Driver {
        action: &'static str,
        locator: String,
        #[source]
        source: DriverError,
    },
}

impl InteractionError {
    pub fn locator(&self) -> &str {
        match self {
            InteractionError::Timeout { locator, .. } => locator,
            InteractionError::Driver { locator, .. } => locator,
        }
    }
}
