// src/tests/utils.rs
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::browser::{DriverError, PageSession};
use crate::telemetry::Telemetry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String),
    Click(String),
    Type(String, String),
    Backspace(String, usize),
}

/// In-memory page: serves canned snapshots and records what was done to it.
pub struct ScriptedSession {
    pages: Vec<String>,
    current: Cell<usize>,
    next_xpath: Option<String>,
    failures: RefCell<HashMap<String, usize>>,
    broken: RefCell<HashSet<String>>,
    attempts: RefCell<HashMap<String, usize>>,
    actions: RefCell<Vec<Action>>,
}

impl ScriptedSession {
    pub fn new(pages: Vec<String>) -> Self {
        Self {
            pages,
            current: Cell::new(0),
            next_xpath: None,
            failures: RefCell::new(HashMap::new()),
            broken: RefCell::new(HashSet::new()),
            attempts: RefCell::new(HashMap::new()),
            actions: RefCell::new(Vec::new()),
        }
    }

    /// Clicking this xpath moves to the next canned page (and stays on the last one).
    pub fn with_next_button(mut self, xpath: &str) -> Self {
        self.next_xpath = Some(xpath.to_string());
        self
    }

    /// The next `n` waits on `xpath` time out.
    pub fn fail_times(&self, xpath: &str, n: usize) {
        self.failures.borrow_mut().insert(xpath.to_string(), n);
    }

    /// Every call on `xpath` fails with a non-timeout error.
    pub fn break_xpath(&self, xpath: &str) {
        self.broken.borrow_mut().insert(xpath.to_string());
    }

    pub fn attempts(&self, xpath: &str) -> usize {
        self.attempts.borrow().get(xpath).copied().unwrap_or(0)
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.borrow().clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.actions
            .borrow()
            .iter()
            .filter_map(|a| match a {
                Action::Click(xpath) => Some(xpath.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn current_page(&self) -> usize {
        self.current.get()
    }

    fn attempt(&self, xpath: &str) -> Result<(), DriverError> {
        *self
            .attempts
            .borrow_mut()
            .entry(xpath.to_string())
            .or_insert(0) += 1;

        if self.broken.borrow().contains(xpath) {
            return Err(DriverError::Browser("target closed".to_string()));
        }

        let mut failures = self.failures.borrow_mut();
        if let Some(left) = failures.get_mut(xpath) {
            if *left > 0 {
                *left -= 1;
                return Err(DriverError::Timeout {
                    xpath: xpath.to_string(),
                    detail: "scripted timeout".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl PageSession for ScriptedSession {
    fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.actions
            .borrow_mut()
            .push(Action::Navigate(url.to_string()));
        Ok(())
    }

    fn click(&self, xpath: &str, _timeout: Duration) -> Result<(), DriverError> {
        self.attempt(xpath)?;
        self.actions
            .borrow_mut()
            .push(Action::Click(xpath.to_string()));

        if self.next_xpath.as_deref() == Some(xpath) && self.current.get() + 1 < self.pages.len()
        {
            self.current.set(self.current.get() + 1);
        }
        Ok(())
    }

    fn type_text(&self, xpath: &str, text: &str, _timeout: Duration) -> Result<(), DriverError> {
        self.attempt(xpath)?;
        self.actions
            .borrow_mut()
            .push(Action::Type(xpath.to_string(), text.to_string()));
        Ok(())
    }

    fn backspace(&self, xpath: &str, count: usize, _timeout: Duration) -> Result<(), DriverError> {
        self.attempt(xpath)?;
        self.actions
            .borrow_mut()
            .push(Action::Backspace(xpath.to_string(), count));
        Ok(())
    }

    fn page_source(&self) -> Result<String, DriverError> {
        self.pages
            .get(self.current.get())
            .cloned()
            .ok_or_else(|| DriverError::Browser("no page loaded".to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Default)]
pub struct RecordingTelemetry {
    lines: RefCell<Vec<(Level, String)>>,
}

impl RecordingTelemetry {
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.borrow().iter().any(|(_, l)| l.contains(needle))
    }

    pub fn count(&self, level: Level) -> usize {
        self.lines.borrow().iter().filter(|(l, _)| *l == level).count()
    }

    fn push(&self, level: Level, message: &str) {
        self.lines.borrow_mut().push((level, message.to_string()));
    }
}

impl Telemetry for RecordingTelemetry {
    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }
}

/// Markup for one result tile in the shape the live site renders.
pub fn tile(year_make: &str, href: &str, price: &str) -> String {
    format!(
        r#"<div class="result-tile">
  <a href="{href}">
    <div class="year-make">{year_make}</div>
    <div class="trim-mileage"><span>EX Sedan 4D</span> <span>34,120 miles</span></div>
    <div class="price"><span>$</span>{price}</div>
    <div class="monthly-payment"><span>Est. <b>$399/mo</b></span></div>
  </a>
</div>"#
    )
}

pub fn results_page(tiles: &[String], indicator: Option<&str>) -> String {
    let pagination = indicator
        .map(|text| {
            format!(
                r#"<span class="paginationstyles__PaginationText-mpry3x-5 iXXOCI">{text}</span>"#
            )
        })
        .unwrap_or_default();
    format!(
        "<html><body><main>{}</main><nav>{pagination}</nav></body></html>",
        tiles.join("\n")
    )
}
