use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app_config::{ScrapeConfig, DEFAULT_OUTPUT_PATH, DEFAULT_START_URL, DEFAULT_WEBDRIVER_URL};
use crate::selectors::{load_selectors, CatalogSelectors};
use crate::ConfigError;

/// Upper bound for the page and detail wait timeouts.
pub const MAX_WAIT_SECS: u64 = 3600;

/// Load scrape configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the selectors file cannot be loaded.
pub fn load_scrape_config() -> Result<ScrapeConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_scrape_config_from_env()
}

/// Load scrape configuration from environment variables already in the process.
///
/// Unlike [`load_scrape_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or the selectors file cannot be loaded.
pub fn load_scrape_config_from_env() -> Result<ScrapeConfig, ConfigError> {
    build_scrape_config(|key| std::env::var(key))
}

/// Build scrape configuration using the provided env-var lookup function.
///
/// Every variable is optional; missing ones fall back to the defaults of
/// [`ScrapeConfig::default`].
fn build_scrape_config<F>(lookup: F) -> Result<ScrapeConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_wait_secs = |var: &str, default: &str| -> Result<Duration, ConfigError> {
        let secs = parse_u64(var, default)?;
        if secs > MAX_WAIT_SECS {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("must be at most {MAX_WAIT_SECS} seconds"),
            });
        }
        Ok(Duration::from_secs(secs))
    };

    let start_url = or_default("SHELFSCAN_START_URL", DEFAULT_START_URL);
    validate_start_url(&start_url)?;

    let output_path = PathBuf::from(or_default("SHELFSCAN_OUTPUT_PATH", DEFAULT_OUTPUT_PATH));
    let backup_dir = PathBuf::from(or_default("SHELFSCAN_BACKUP_DIR", "."));
    let webdriver_url = or_default("SHELFSCAN_WEBDRIVER_URL", DEFAULT_WEBDRIVER_URL);
    let headless = parse_bool("SHELFSCAN_HEADLESS", &or_default("SHELFSCAN_HEADLESS", "false"))?;
    let log_level = or_default("SHELFSCAN_LOG_LEVEL", "info");

    let page_wait = parse_wait_secs("SHELFSCAN_PAGE_WAIT_SECS", "10")?;
    let scroll_pause = Duration::from_millis(parse_u64("SHELFSCAN_SCROLL_PAUSE_MS", "350")?);
    let detail_wait = parse_wait_secs("SHELFSCAN_DETAIL_WAIT_SECS", "10")?;
    let settle_delay = Duration::from_millis(parse_u64("SHELFSCAN_SETTLE_MS", "500")?);

    let poll_interval_ms = parse_u64("SHELFSCAN_POLL_INTERVAL_MS", "250")?;
    if poll_interval_ms == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHELFSCAN_POLL_INTERVAL_MS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let poll_interval = Duration::from_millis(poll_interval_ms);

    let selectors = match lookup("SHELFSCAN_SELECTORS_PATH") {
        Ok(path) if !path.trim().is_empty() => load_selectors(Path::new(path.trim()))?,
        _ => CatalogSelectors::default(),
    };

    Ok(ScrapeConfig {
        start_url,
        output_path,
        backup_dir,
        webdriver_url,
        headless,
        log_level,
        page_wait,
        scroll_pause,
        detail_wait,
        settle_delay,
        poll_interval,
        selectors,
    })
}

/// Checks that `raw` is an absolute `http`/`https` URL usable as a base for
/// relative product links.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] naming `SHELFSCAN_START_URL`.
pub fn validate_start_url(raw: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar {
        var: "SHELFSCAN_START_URL".to_string(),
        reason,
    };
    let parsed = url::Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme \"{other}\""))),
    }
}

/// Parse a boolean flag. Accepts `true/false`, `1/0`, `yes/no` (case-insensitive).
fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
