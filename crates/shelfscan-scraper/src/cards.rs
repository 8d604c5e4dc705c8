//! Product card extraction from a rendered listing page.
//!
//! Cards, titles, and prices are each located through a [`SelectorChain`]:
//! the known-good selector first, broader fallbacks only when it matches
//! nothing. A card without a usable link or title is skipped; a card without
//! a price keeps empty price fields. One bad card never stops the others.

use shelfscan_core::{Item, ScrapeConfig, SelectorChain};
use url::Url;

use crate::error::ScrapeError;
use crate::renderer::Renderer;
use crate::wait::wait_for_any;

pub struct CardExtractor<'a, R: Renderer> {
    renderer: &'a R,
    config: &'a ScrapeConfig,
    base_url: Url,
}

impl<'a, R: Renderer> CardExtractor<'a, R> {
    /// Creates an extractor resolving relative links against `config.start_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidUrl`] if the start URL cannot be parsed.
    pub fn new(renderer: &'a R, config: &'a ScrapeConfig) -> Result<Self, ScrapeError> {
        let base_url = Url::parse(&config.start_url).map_err(|e| ScrapeError::InvalidUrl {
            href: config.start_url.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            renderer,
            config,
            base_url,
        })
    }

    /// Waits until any card selector matches.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::WaitTimeout`] if no card appears within `page_wait`.
    /// - [`ScrapeError::Render`] if the renderer fails while polling.
    pub async fn wait_for_cards(&self) -> Result<(), ScrapeError> {
        let selectors: Vec<&str> = self.config.selectors.card.iter().collect();
        wait_for_any(
            self.renderer,
            &selectors,
            self.config.page_wait,
            self.config.poll_interval,
        )
        .await
    }

    /// Appends the items of every usable card currently in the DOM to
    /// `items`, in DOM order, and returns how many were appended.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Render`] only if locating the cards themselves
    /// fails. Per-card failures are logged and skipped.
    pub async fn extract_into(&self, items: &mut Vec<Item>) -> Result<usize, ScrapeError> {
        let (selector, cards) = self.locate_cards().await?;
        tracing::debug!(selector, cards = cards.len(), "located cards");

        let mut added = 0usize;
        for (index, card) in cards.iter().enumerate() {
            match self.extract_card(card).await {
                Ok(item) => {
                    items.push(item);
                    added += 1;
                }
                Err(e) if e.is_expected_absence() => {
                    tracing::debug!(card = index, error = %e, "skipping card");
                }
                Err(e) => {
                    tracing::warn!(card = index, error = %e, "skipping unreadable card");
                }
            }
        }

        Ok(added)
    }

    /// Cards from the first selector of the chain that matches anything.
    async fn locate_cards(&self) -> Result<(&'a str, Vec<R::Element>), ScrapeError> {
        let chain: &'a SelectorChain = &self.config.selectors.card;
        for selector in chain.iter() {
            let cards = self.renderer.find_all(selector).await?;
            if !cards.is_empty() {
                return Ok((selector, cards));
            }
        }
        Ok((chain.primary().unwrap_or_default(), Vec::new()))
    }

    async fn extract_card(&self, card: &R::Element) -> Result<Item, ScrapeError> {
        let selectors = &self.config.selectors;

        let link = self
            .renderer
            .find_first_within(card, &selectors.card_link)
            .await?
            .ok_or(ScrapeError::MissingField { field: "link" })?;

        let title = self
            .text_in_chain(card, &selectors.title)
            .await?
            .filter(|t| !t.is_empty())
            .ok_or(ScrapeError::MissingField { field: "title" })?;

        let href = self
            .renderer
            .attribute(&link, "href")
            .await?
            .unwrap_or_default();
        let url = resolve_product_url(&self.base_url, &href)?;

        let (price, original_price) = match self.text_in_chain(card, &selectors.price).await {
            Ok(Some(text)) => split_price_lines(&text),
            Ok(None) => (String::new(), String::new()),
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "price unreadable; leaving it empty");
                (String::new(), String::new())
            }
        };

        Ok(Item::listed(title, price, original_price, url))
    }

    /// Trimmed text of the first element matched inside `card` by the first
    /// selector of `chain` that matches anything.
    async fn text_in_chain(
        &self,
        card: &R::Element,
        chain: &SelectorChain,
    ) -> Result<Option<String>, ScrapeError> {
        for selector in chain.iter() {
            if let Some(element) = self.renderer.find_first_within(card, selector).await? {
                let text = self.renderer.text(&element).await?;
                return Ok(Some(text.trim().to_string()));
            }
        }
        Ok(None)
    }
}

/// Splits a price block into `(price, original_price)`.
///
/// The first non-blank line is the current price, the second the original
/// (pre-discount) price. Text is kept exactly as displayed.
#[must_use]
pub fn split_price_lines(text: &str) -> (String, String) {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let price = lines.next().unwrap_or_default().to_string();
    let original_price = lines.next().unwrap_or_default().to_string();
    (price, original_price)
}

/// Resolves a card's `href` against the storefront base URL.
///
/// # Errors
///
/// Returns [`ScrapeError::InvalidUrl`] if `href` is blank, cannot be joined
/// onto `base`, or does not resolve to an `http`/`https` URL.
pub fn resolve_product_url(base: &Url, href: &str) -> Result<String, ScrapeError> {
    let href = href.trim();
    let invalid = |reason: String| ScrapeError::InvalidUrl {
        href: href.to_string(),
        reason,
    };

    if href.is_empty() {
        return Err(invalid("link has no href".to_string()));
    }

    let resolved = base.join(href).map_err(|e| invalid(e.to_string()))?;
    match resolved.scheme() {
        "http" | "https" => Ok(resolved.to_string()),
        other => Err(invalid(format!("unsupported scheme \"{other}\""))),
    }
}

#[cfg(test)]
#[path = "cards_test.rs"]
mod tests;
