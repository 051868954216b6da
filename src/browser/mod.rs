mod browser_error;
mod chrome;
mod controller;
mod locator;
mod session;

pub use browser_error::{DriverError, InteractionError};
pub use chrome::{BrowserOptions, ChromeSession};
pub use controller::InteractionController;
pub use locator::Locator;
pub use session::PageSession;
