// src/scraper/paginator.rs
use scraper::{Html, Selector};

use crate::browser::{InteractionController, Locator, PageSession};
use crate::config::SiteProfile;
use crate::domain::ResultSet;
use crate::scraper::{ExtractorError, PageExtractor, PaginationError};
use crate::telemetry::Telemetry;

/// Result of a lookup that is allowed to come up empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

/// "Page 2 of 14" as read from the pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub current: u32,
    pub total: u32,
}

impl PaginationState {
    /// Second token is the current page, last token the total. Surrounding
    /// label words are ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.len() < 2 {
            return None;
        }
        let current = tokens[1].parse().ok()?;
        let total = tokens[tokens.len() - 1].parse().ok()?;
        Some(Self { current, total })
    }

    pub fn is_last(&self) -> bool {
        self.current >= self.total
    }
}

/// Where the loop goes after looking at a snapshot's pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Done,
    Advance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    LastPage,
    PageCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSummary {
    pub pages: usize,
    pub records: usize,
    pub skipped_tiles: usize,
    pub termination: Termination,
}

#[derive(Debug, Clone, Copy)]
pub struct PaginationLimits {
    pub max_pages: usize,
    pub stall_limit: usize,
}

enum Step {
    Fetch,
    Extract(Html),
    CheckEnd(Html),
    Advance,
    Done(Termination),
}

pub struct Paginator<'a> {
    session: &'a dyn PageSession,
    controller: &'a InteractionController<'a>,
    extractor: &'a PageExtractor<'a>,
    telemetry: &'a dyn Telemetry,
    pagination_text: Selector,
    next_button: Locator,
    limits: PaginationLimits,
}

impl<'a> Paginator<'a> {
    pub fn new(
        session: &'a dyn PageSession,
        controller: &'a InteractionController<'a>,
        extractor: &'a PageExtractor<'a>,
        telemetry: &'a dyn Telemetry,
        site: &SiteProfile,
        limits: PaginationLimits,
    ) -> Result<Self, ExtractorError> {
        let pagination_text =
            Selector::parse(&site.pagination_text).map_err(|e| ExtractorError::Selector {
                selector: site.pagination_text.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            session,
            controller,
            extractor,
            telemetry,
            pagination_text,
            next_button: Locator::text("button", &site.next_button_label),
            limits,
        })
    }

    /// Pages through the results, appending to `results` as it goes. On error
    /// whatever was collected so far stays in `results`.
    pub fn run(&self, results: &mut ResultSet) -> Result<PaginationSummary, PaginationError> {
        let mut pages = 0;
        let mut skipped_tiles = 0;
        let mut stalled_advances = 0;
        // Record count when Next was last clicked; none until the first click.
        let mut records_at_last_click: Option<usize> = None;
        let mut step = Step::Fetch;

        let termination = loop {
            step = match step {
                Step::Fetch => {
                    let html = self.session.page_source()?;
                    Step::Extract(Html::parse_document(&html))
                }
                Step::Extract(document) => {
                    pages += 1;
                    let page = self.extractor.extract_document(&document);

                    if !page.counts.is_balanced() {
                        self.telemetry.warn(&format!(
                            "page {pages}: structural groups differ in size {:?}",
                            page.counts
                        ));
                    }
                    for failure in &page.failures {
                        self.telemetry
                            .warn(&format!("page {pages}: skipped {failure}"));
                    }
                    skipped_tiles += page.failures.len();

                    for record in &page.records {
                        results.push_record(record);
                    }
                    self.telemetry.debug(&format!(
                        "page {pages}: {} records ({} total)",
                        page.records.len(),
                        results.len()
                    ));
                    Step::CheckEnd(document)
                }
                Step::CheckEnd(document) => match self.check_end(&document) {
                    Transition::Done => Step::Done(Termination::LastPage),
                    Transition::Advance => Step::Advance,
                },
                Step::Advance => {
                    if pages >= self.limits.max_pages {
                        self.telemetry.warn(&format!(
                            "stopping at page cap of {} pages",
                            self.limits.max_pages
                        ));
                        Step::Done(Termination::PageCap)
                    } else {
                        if let Some(baseline) = records_at_last_click {
                            if results.len() > baseline {
                                stalled_advances = 0;
                            } else {
                                stalled_advances += 1;
                            }
                        }

                        if stalled_advances > 0 && stalled_advances >= self.limits.stall_limit {
                            self.telemetry.error(&format!(
                                "no new records across {stalled_advances} advances, giving up"
                            ));
                            return Err(PaginationError::Stalled {
                                advances: stalled_advances,
                                records: results.len(),
                            });
                        }

                        records_at_last_click = Some(results.len());
                        self.controller.locate_and_click(&self.next_button)?;
                        Step::Fetch
                    }
                }
                Step::Done(termination) => break termination,
            };
        };

        Ok(PaginationSummary {
            pages,
            records: results.len(),
            skipped_tiles,
            termination,
        })
    }

    /// A missing or unreadable control is treated as a render race, never as
    /// the end of the results.
    pub fn check_end(&self, document: &Html) -> Transition {
        match self.lookup_indicator(document) {
            Lookup::Found(text) => match PaginationState::parse(&text) {
                Some(state) => {
                    self.telemetry
                        .info(&format!("Page {} of {}", state.current, state.total));
                    if state.is_last() {
                        Transition::Done
                    } else {
                        Transition::Advance
                    }
                }
                None => {
                    self.telemetry
                        .info(&format!("unreadable pagination text {text:?}"));
                    Transition::Advance
                }
            },
            Lookup::NotFound => {
                self.telemetry
                    .info("navigated too quickly to catch the page number");
                Transition::Advance
            }
        }
    }

    /// The label may be split across text nodes (`Page <!-- -->2<!-- --> of ...`),
    /// so all of the control's text is joined before it is parsed.
    fn lookup_indicator(&self, document: &Html) -> Lookup<String> {
        let text = document
            .select(&self.pagination_text)
            .next()
            .map(|control| {
                control
                    .text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default();

        if text.is_empty() {
            Lookup::NotFound
        } else {
            Lookup::Found(text)
        }
    }
}
