// src/browser/controller.rs
use std::thread;
use std::time::Duration;

use crate::browser::{DriverError, InteractionError, Locator, PageSession};
use crate::telemetry::Telemetry;

/// One wait, then one identical retry. No backoff.
const MAX_ATTEMPTS: u32 = 2;

pub struct InteractionController<'a> {
    session: &'a dyn PageSession,
    telemetry: &'a dyn Telemetry,
    timeout: Duration,
    settle: Duration,
}

impl<'a> InteractionController<'a> {
    pub fn new(
        session: &'a dyn PageSession,
        telemetry: &'a dyn Telemetry,
        timeout: Duration,
        settle: Duration,
    ) -> Self {
        Self {
            session,
            telemetry,
            timeout,
            settle,
        }
    }

    pub fn locate_and_click(&self, locator: &Locator) -> Result<(), InteractionError> {
        self.with_retry("click", locator, |xpath, timeout| {
            self.session.click(xpath, timeout)
        })
    }

    pub fn enter_text(&self, text: &str, locator: &Locator) -> Result<(), InteractionError> {
        self.with_retry("enter text", locator, |xpath, timeout| {
            self.session.type_text(xpath, text, timeout)
        })
    }

    pub fn backspace_text(&self, count: usize, locator: &Locator) -> Result<(), InteractionError> {
        self.with_retry("backspace", locator, |xpath, timeout| {
            self.session.backspace(xpath, count, timeout)
        })
    }

    fn with_retry<F>(
        &self,
        action: &'static str,
        locator: &Locator,
        op: F,
    ) -> Result<(), InteractionError>
    where
        F: Fn(&str, Duration) -> Result<(), DriverError>,
    {
        let xpath = locator.xpath();
        let mut attempt = 1;

        loop {
            match op(&xpath, self.timeout) {
                Ok(()) => break,
                Err(DriverError::Timeout { detail, .. }) if attempt < MAX_ATTEMPTS => {
                    self.telemetry.debug(&format!(
                        "{action} on {xpath} timed out ({detail}), retrying"
                    ));
                    attempt += 1;
                }
                Err(DriverError::Timeout { .. }) => {
                    self.telemetry
                        .error(&format!("{action} on {xpath} timed out twice, giving up"));
                    return Err(InteractionError::Timeout {
                        action,
                        locator: xpath,
                        attempts: attempt,
                    });
                }
                Err(source) => {
                    self.telemetry
                        .error(&format!("{action} on {xpath} failed: {source}"));
                    return Err(InteractionError::Driver {
                        action,
                        locator: xpath,
                        source,
                    });
                }
            }
        }

        // Crude stand-in for a render-complete signal.
        thread::sleep(self.settle);
        Ok(())
    }
}
