use serde::{Deserialize, Serialize};

/// A product harvested from a storefront listing page.
///
/// Field order is the serialized key order of the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Card title as displayed, e.g. `"Oracle Red Bull Racing 2025 Team Polo"`.
    pub title: String,
    /// Current (possibly sale) price exactly as displayed, e.g. `"£90.00"`.
    /// Empty when the card shows no price.
    pub price: String,
    /// Pre-discount price, present only when the card shows two price lines.
    pub original_price: String,
    /// Absolute product URL. Identity key for deduplication.
    pub url: String,
    /// Sizes currently purchasable, in the order the detail page lists them.
    /// Empty until the item has been enriched.
    pub available_sizes: Vec<String>,
}

impl Item {
    /// Creates an item as seen on a listing page, before enrichment.
    #[must_use]
    pub fn listed(title: String, price: String, original_price: String, url: String) -> Self {
        Self {
            title,
            price,
            original_price,
            url,
            available_sizes: Vec::new(),
        }
    }

    /// Returns `true` if the detail page reported at least one available size.
    #[must_use]
    pub fn has_sizes(&self) -> bool {
        !self.available_sizes.is_empty()
    }

    /// Returns at most `max_chars` characters of the title, for log lines.
    #[must_use]
    pub fn title_fragment(&self, max_chars: usize) -> &str {
        match self.title.char_indices().nth(max_chars) {
            Some((idx, _)) => &self.title[..idx],
            None => &self.title,
        }
    }
}
