// src/config.rs
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Spreadsheet flavour used when the result set has a uniform shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    Csv,
    Xlsx,
}

impl FromStr for TabularFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(TabularFormat::Csv),
            "xlsx" => Ok(TabularFormat::Xlsx),
            other => Err(format!("expected csv or xlsx, got {other}")),
        }
    }
}

/// What to record when the monthly-payment span holds a single node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyPaymentMode {
    /// The node's text.
    Scalar,
    /// The one-element node list, written as a JSON array. Matches files
    /// produced by older runs.
    LegacySequence,
}

impl FromStr for MonthlyPaymentMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scalar" => Ok(MonthlyPaymentMode::Scalar),
            "legacy" => Ok(MonthlyPaymentMode::LegacySequence),
            other => Err(format!("expected scalar or legacy, got {other}")),
        }
    }
}

/// Run configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub zip_code: Option<String>,
    pub filters_path: PathBuf,
    pub output_dir: PathBuf,
    pub log_dir: PathBuf,
    pub tabular_format: TabularFormat,
    pub headless: bool,
    pub wait_timeout: Duration,
    pub settle: Duration,
    pub max_pages: usize,
    pub stall_limit: usize,
    pub persist_on_abort: bool,
    pub monthly_payment_mode: MonthlyPaymentMode,
    pub site: SiteProfile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zip_code: Some("78750".to_string()),
            filters_path: PathBuf::from("data/filters.json"),
            output_dir: PathBuf::from("data/raw"),
            log_dir: PathBuf::from("logs"),
            tabular_format: TabularFormat::Csv,
            headless: true,
            wait_timeout: Duration::from_secs(7),
            settle: Duration::from_secs(2),
            max_pages: 500,
            stall_limit: 3,
            persist_on_abort: true,
            monthly_payment_mode: MonthlyPaymentMode::Scalar,
            site: SiteProfile::default(),
        }
    }
}

impl Config {
    /// Load configuration from `SCRAPER_*` environment variables, falling back
    /// to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();

        let defaults = Config::default();
        let mut site = defaults.site;
        if let Ok(url) = env::var("SCRAPER_SEARCH_URL") {
            site.search_url = url;
        }

        Ok(Self {
            zip_code: match env::var("SCRAPER_ZIP_CODE") {
                Ok(zip) if zip.trim().is_empty() => None,
                Ok(zip) => Some(zip.trim().to_string()),
                Err(_) => defaults.zip_code,
            },
            filters_path: env::var("SCRAPER_FILTERS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.filters_path),
            output_dir: env::var("SCRAPER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            log_dir: env::var("SCRAPER_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            tabular_format: parse_var("SCRAPER_TABULAR_FORMAT", defaults.tabular_format)?,
            headless: parse_var("SCRAPER_HEADLESS", defaults.headless)?,
            wait_timeout: parse_var::<u64>("SCRAPER_WAIT_TIMEOUT_SECS", 7)
                .map(Duration::from_secs)?,
            settle: parse_var::<u64>("SCRAPER_SETTLE_MILLIS", 2000).map(Duration::from_millis)?,
            max_pages: parse_var("SCRAPER_MAX_PAGES", defaults.max_pages)?,
            stall_limit: parse_var("SCRAPER_STALL_LIMIT", defaults.stall_limit)?,
            persist_on_abort: parse_var("SCRAPER_PERSIST_ON_ABORT", defaults.persist_on_abort)?,
            monthly_payment_mode: parse_var(
                "SCRAPER_MONTHLY_PAYMENT_MODE",
                defaults.monthly_payment_mode,
            )?,
            site,
        })
    }
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Which panel toggle opens a filter category, and whether picking a value
/// also takes its whole sub-group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPanel {
    pub category: String,
    pub toggle_label: String,
    pub select_all: bool,
}

/// Everything the crate knows about the site's markup. When the site is
/// redesigned, this is the place to edit.
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub origin: String,
    pub search_url: String,

    // Results grid, as CSS selectors against the snapshot.
    pub tile: String,
    pub year_make: String,
    pub trim_mileage: String,
    pub price: String,
    pub monthly_payment: String,
    pub listing_link: String,
    pub delivery_badge: String,
    pub locked_callout: String,
    pub pagination_text: String,

    // Controls, as visible labels / attributes for the live page.
    pub next_button_label: String,
    pub select_all_label: String,
    pub location_button_label: String,
    pub zip_input_id: String,
    pub zip_submit_label: String,
    pub zip_prefill_len: usize,
    pub filter_panels: Vec<FilterPanel>,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            origin: "https://www.carvana.com".to_string(),
            search_url: "https://www.carvana.com/cars?geolocation".to_string(),
            tile: "div.result-tile".to_string(),
            year_make: "div.year-make".to_string(),
            trim_mileage: "div.trim-mileage".to_string(),
            price: "div.price, div.flex.items-end.font-bold.text-2xl".to_string(),
            monthly_payment: "div.monthly-payment".to_string(),
            listing_link: "a[href]".to_string(),
            delivery_badge: "div.days-to-delivery".to_string(),
            locked_callout: "div.purchase-callout.text-only.locked".to_string(),
            pagination_text: "span[class*='PaginationText']".to_string(),
            next_button_label: "Next".to_string(),
            select_all_label: "Select All".to_string(),
            location_button_label: "Location".to_string(),
            zip_input_id: "zip code".to_string(),
            zip_submit_label: "GO".to_string(),
            zip_prefill_len: 5,
            filter_panels: vec![FilterPanel {
                category: "make".to_string(),
                toggle_label: "MAKE & MODEL".to_string(),
                select_all: true,
            }],
        }
    }
}

impl SiteProfile {
    /// Unknown categories get a toggle labelled with the upper-cased category
    /// name and no select-all step.
    pub fn panel_for(&self, category: &str) -> FilterPanel {
        self.filter_panels
            .iter()
            .find(|p| p.category.eq_ignore_ascii_case(category))
            .cloned()
            .unwrap_or_else(|| FilterPanel {
                category: category.to_string(),
                toggle_label: category.to_uppercase(),
                select_all: false,
            })
    }
}
