pub mod listing;
pub mod result_set;

pub use listing::{Field, ListingRecord, NO_STATUS};
pub use result_set::ResultSet;
