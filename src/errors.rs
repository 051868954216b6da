// errors.rs
use thiserror::Error;

use crate::browser::{DriverError, InteractionError};
use crate::scraper::{ExtractorError, PaginationError};
use crate::search::FilterFileError;
use crate::spreadsheets::WriteError;

/// Anything that ends a run before the results are persisted.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("filter definitions: {0}")]
    Filters(#[from] FilterFileError),

    #[error("browser session: {0}")]
    Browser(#[from] DriverError),

    #[error("site profile: {0}")]
    SiteProfile(#[from] ExtractorError),

    #[error("interaction failed: {0}")]
    Interaction(#[from] InteractionError),

    #[error("pagination failed: {0}")]
    Pagination(#[from] PaginationError),

    #[error("could not save results: {0}")]
    Persist(#[from] WriteError),
}
