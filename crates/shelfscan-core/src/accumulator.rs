//! Cross-session item collection keyed by product URL.
//!
//! The first item seen for a URL wins. Items from later sessions that share a
//! URL are discarded, not merged, so a later visit never refreshes the price
//! or sizes recorded by an earlier one.

use std::collections::HashSet;

use crate::items::Item;

/// Counts returned by [`Accumulator::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub added: usize,
    pub discarded: usize,
}

/// Deduplicated, insertion-ordered collection of items for a whole run.
#[derive(Debug, Default)]
pub struct Accumulator {
    items: Vec<Item>,
    seen_urls: HashSet<String>,
}

impl Accumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every item whose URL has not been seen yet, in iteration order.
    pub fn merge<I>(&mut self, items: I) -> MergeStats
    where
        I: IntoIterator<Item = Item>,
    {
        let mut stats = MergeStats::default();
        for item in items {
            if self.seen_urls.insert(item.url.clone()) {
                self.items.push(item);
                stats.added += 1;
            } else {
                stats.discarded += 1;
            }
        }
        stats
    }

    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of accumulated items with at least one available size.
    #[must_use]
    pub fn with_sizes_count(&self) -> usize {
        self.items.iter().filter(|i| i.has_sizes()).count()
    }
}
