// src/browser/session.rs
use std::time::Duration;

use crate::browser::DriverError;

/// The live page a run drives. One per run.
///
/// Every element-addressed call waits up to `timeout` for the element before
/// acting and reports `DriverError::Timeout` when it never shows up. Retrying
/// is the caller's business.
pub trait PageSession {
    fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Waits for presence, then clicks through script rather than a pointer event.
    fn click(&self, xpath: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Waits for visibility, then sends the keys.
    fn type_text(&self, xpath: &str, text: &str, timeout: Duration) -> Result<(), DriverError>;

    /// Waits for visibility, then deletes `count` trailing characters.
    fn backspace(&self, xpath: &str, count: usize, timeout: Duration) -> Result<(), DriverError>;

    /// Fully rendered markup of the current page.
    fn page_source(&self) -> Result<String, DriverError>;
}
