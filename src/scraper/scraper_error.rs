use thiserror::Error;

use crate::browser::{DriverError, InteractionError};

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("invalid selector {selector:?}: {reason}")]
    Selector { selector: String, reason: String },

    #[error("invalid site origin {origin:?}: {reason}")]
    Origin { origin: String, reason: String },
}

/// One tile that could not be turned into a record. The rest of the page is
/// still extracted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("tile {tile_index}: {reason}")]
pub struct ExtractionFailure {
    pub tile_index: usize,
    pub reason: String,
}

#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("could not capture page snapshot: {0}")]
    Snapshot(#[from] DriverError),

    #[error(transparent)]
    Interaction(#[from] InteractionError),

    #[error("no new records after {advances} page advances ({records} records so far)")]
    Stalled { advances: usize, records: usize },
}
