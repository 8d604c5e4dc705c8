pub mod accumulator;
pub mod app_config;
pub mod config;
pub mod items;
pub mod selectors;

pub use accumulator::{Accumulator, MergeStats};
pub use app_config::ScrapeConfig;
pub use config::{load_scrape_config, load_scrape_config_from_env, validate_start_url};
pub use items::Item;
pub use selectors::{load_selectors, CatalogSelectors, SelectorChain};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for env var {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read selectors file {path}: {source}")]
    SelectorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse selectors file: {0}")]
    SelectorsFileParse(#[from] serde_yaml::Error),

    #[error("config validation failed: {0}")]
    Validation(String),
}
