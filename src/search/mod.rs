mod applier;
mod filters;
mod location;
mod search_error;

pub use applier::FilterApplier;
pub use filters::FilterSet;
pub use location::LocationSetter;
pub use search_error::FilterFileError;
