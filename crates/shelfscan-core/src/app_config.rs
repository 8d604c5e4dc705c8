use std::path::PathBuf;
use std::time::Duration;

use crate::selectors::CatalogSelectors;

pub const DEFAULT_START_URL: &str = "https://f1store.formula1.com";
pub const DEFAULT_OUTPUT_PATH: &str = "f1_store_items.json";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Everything a scrape run needs, passed explicitly to each component.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Storefront entry page; also the base for resolving relative product links.
    pub start_url: String,
    pub output_path: PathBuf,
    /// Directory that receives `<stem>_backup_<unix-secs>.<ext>` when the
    /// primary write fails.
    pub backup_dir: PathBuf,
    pub webdriver_url: String,
    pub headless: bool,
    pub log_level: String,
    /// Upper bound for waiting on listing cards and pagination confirmation.
    pub page_wait: Duration,
    /// Pause after each scroll step so lazy content can load.
    pub scroll_pause: Duration,
    /// Upper bound for waiting on the size picker of a detail page.
    pub detail_wait: Duration,
    /// Pause letting the page settle before a click or a read.
    pub settle_delay: Duration,
    /// Interval between element polls while waiting.
    pub poll_interval: Duration,
    pub selectors: CatalogSelectors,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            backup_dir: PathBuf::from("."),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: false,
            log_level: "info".to_string(),
            page_wait: Duration::from_secs(10),
            scroll_pause: Duration::from_millis(350),
            detail_wait: Duration::from_secs(10),
            settle_delay: Duration::from_millis(500),
            poll_interval: Duration::from_millis(250),
            selectors: CatalogSelectors::default(),
        }
    }
}
