use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterFileError {
    #[error("could not read filter file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("filter file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("filter file must be an object of category -> list of values")]
    NotAnObject,

    #[error("filter category {category:?} must be a list of strings")]
    BadCategory { category: String },
}
