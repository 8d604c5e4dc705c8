//! CSS selectors for the storefront catalog.
//!
//! Defaults target the F1 store markup. A YAML file may override any subset
//! of them; fields left out keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Ordered list of selectors tried one after another. The first selector
/// that matches at least one element wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorChain(Vec<String>);

impl SelectorChain {
    #[must_use]
    pub fn new<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(selectors.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The known-good selector tried first.
    #[must_use]
    pub fn primary(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for SelectorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(" | "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSelectors {
    /// Product cards on a listing page.
    pub card: SelectorChain,
    /// Link inside a card carrying the product URL in `href`.
    pub card_link: String,
    pub title: SelectorChain,
    /// Price block; its first text line is the current price, the second the
    /// original price.
    pub price: SelectorChain,
    pub next_page: String,
    /// Present once a paginated listing has rendered.
    pub current_page: String,
    /// Size picker on a product detail page.
    pub size_selector: String,
    /// Size options that are in stock.
    pub available_size: String,
    /// Input inside an available size option carrying the size in `value`.
    pub size_input: String,
    /// Visible label used when the option has no input.
    pub size_text: String,
}

impl Default for CatalogSelectors {
    fn default() -> Self {
        Self {
            card: SelectorChain::new([
                "div.ds-card",
                "[class*='product-card'], article[class*='card']",
            ]),
            card_link: "a".to_string(),
            title: SelectorChain::new(["[class*='title']", "[class*='name'], h2, h3, h4"]),
            price: SelectorChain::new(["[class*='price']", "[itemprop='price'], [data-price]"]),
            next_page: "a[data-trk-id='next-page']".to_string(),
            current_page: "a.page-link.current-page".to_string(),
            size_selector: ".size-selector-list, [class*='size-selector']".to_string(),
            available_size: "label.size-selector-button.available".to_string(),
            size_input: "input[name='size-selector']".to_string(),
            size_text: ".size-text, span".to_string(),
        }
    }
}

/// Load and validate catalog selectors from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_selectors(path: &Path) -> Result<CatalogSelectors, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SelectorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let selectors: CatalogSelectors = serde_yaml::from_str(&content)?;

    validate_selectors(&selectors)?;

    Ok(selectors)
}

fn validate_selectors(selectors: &CatalogSelectors) -> Result<(), ConfigError> {
    let chains = [
        ("card", &selectors.card),
        ("title", &selectors.title),
        ("price", &selectors.price),
    ];
    for (name, chain) in chains {
        if chain.is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector chain '{name}' must list at least one selector"
            )));
        }
        if chain.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "selector chain '{name}' contains an empty selector"
            )));
        }
    }

    let singles = [
        ("card_link", &selectors.card_link),
        ("next_page", &selectors.next_page),
        ("current_page", &selectors.current_page),
        ("size_selector", &selectors.size_selector),
        ("available_size", &selectors.available_size),
        ("size_input", &selectors.size_input),
        ("size_text", &selectors.size_text),
    ];
    for (name, selector) in singles {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "selector '{name}' must be non-empty"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "selectors_test.rs"]
mod tests;
