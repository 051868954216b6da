mod extractor;
mod paginator;
mod scraper_error;

pub use extractor::PageExtractor;
pub use paginator::{PaginationLimits, PaginationSummary, Paginator, Termination};
pub use scraper_error::{ExtractionFailure, ExtractorError, PaginationError};
