pub mod export_csv;
pub mod export_xlsx;
mod writer;
mod writer_error;

#[cfg(test)]
pub use writer::Encoding;
pub use writer::{PersistOutcome, ResultWriter};
pub use writer_error::WriteError;
