// src/browser/chrome.rs
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use headless_chrome::{Browser, Element, LaunchOptions, Tab};

use crate::browser::{DriverError, PageSession};

const CLICK_JS: &str = "function() { this.click(); }";
const IS_VISIBLE_JS: &str = "function() { \
    const r = this.getBoundingClientRect(); \
    const s = window.getComputedStyle(this); \
    return r.width > 0 && r.height > 0 && s.visibility !== 'hidden'; }";
const VISIBILITY_POLL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub headless: bool,
    pub window_size: (u32, u32),
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            // Stand-in for a maximized window; the results grid collapses when narrow.
            window_size: (1920, 1080),
        }
    }
}

pub struct ChromeSession {
    // Dropping the browser kills the Chrome process, so it lives as long as the tab.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    pub fn launch(options: &BrowserOptions) -> Result<Self, DriverError> {
        let launch = LaunchOptions {
            headless: options.headless,
            sandbox: false,
            window_size: Some(options.window_size),
            idle_browser_timeout: Duration::from_secs(600),
            ..Default::default()
        };

        let browser = Browser::new(launch).map_err(|e| DriverError::Browser(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| DriverError::Browser(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    fn wait_present(&self, xpath: &str, timeout: Duration) -> Result<Element<'_>, DriverError> {
        self.tab
            .wait_for_xpath_with_custom_timeout(xpath, timeout)
            .map_err(|e| DriverError::Timeout {
                xpath: xpath.to_string(),
                detail: e.to_string(),
            })
    }

    fn wait_visible(&self, xpath: &str, timeout: Duration) -> Result<Element<'_>, DriverError> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let element = self.wait_present(xpath, remaining)?;

            let visible = element
                .call_js_fn(IS_VISIBLE_JS, vec![], false)
                .map_err(|e| DriverError::Browser(e.to_string()))?
                .value
                .and_then(|v| v.as_bool())
                .unwrap_or(false);

            if visible {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout {
                    xpath: xpath.to_string(),
                    detail: "element present but never visible".to_string(),
                });
            }
            thread::sleep(VISIBILITY_POLL);
        }
    }
}

impl PageSession for ChromeSession {
    fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| DriverError::Browser(e.to_string()))?;
        Ok(())
    }

    fn click(&self, xpath: &str, timeout: Duration) -> Result<(), DriverError> {
        let element = self.wait_present(xpath, timeout)?;
        element
            .call_js_fn(CLICK_JS, vec![], false)
            .map_err(|e| DriverError::Browser(e.to_string()))?;
        Ok(())
    }

    fn type_text(&self, xpath: &str, text: &str, timeout: Duration) -> Result<(), DriverError> {
        let element = self.wait_visible(xpath, timeout)?;
        element
            .type_into(text)
            .map_err(|e| DriverError::Browser(e.to_string()))?;
        Ok(())
    }

    fn backspace(&self, xpath: &str, count: usize, timeout: Duration) -> Result<(), DriverError> {
        let element = self.wait_visible(xpath, timeout)?;
        element
            .click()
            .map_err(|e| DriverError::Browser(e.to_string()))?;
        self.tab
            .press_key("End")
            .map_err(|e| DriverError::Browser(e.to_string()))?;
        for _ in 0..count {
            self.tab
                .press_key("Backspace")
                .map_err(|e| DriverError::Browser(e.to_string()))?;
        }
        Ok(())
    }

    fn page_source(&self) -> Result<String, DriverError> {
        self.tab
            .get_content()
            .map_err(|e| DriverError::Browser(e.to_string()))
    }
}
