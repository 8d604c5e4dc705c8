//! Detail-page enrichment: the in-stock sizes of each collected item.

use shelfscan_core::{Item, ScrapeConfig};

use crate::context::with_detail_context;
use crate::error::ScrapeError;
use crate::pagination::pause;
use crate::renderer::Renderer;
use crate::wait::wait_for;

/// Title characters shown in per-item log lines.
const TITLE_LOG_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub with_sizes: usize,
    pub without_sizes: usize,
    /// Items whose detail page could not be read; also counted in
    /// `without_sizes`.
    pub failed: usize,
}

pub struct DetailEnricher<'a, R: Renderer> {
    renderer: &'a R,
    config: &'a ScrapeConfig,
}

impl<'a, R: Renderer> DetailEnricher<'a, R> {
    #[must_use]
    pub fn new(renderer: &'a R, config: &'a ScrapeConfig) -> Self {
        Self { renderer, config }
    }

    /// Visits every item's detail page, in order, and sets its
    /// `available_sizes`.
    ///
    /// Each page is read in its own browsing context and the listing context
    /// is active again before the next item. An item whose page fails for
    /// any reason gets an empty size list and the batch moves on.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Render`] only if the current (listing) context
    /// cannot be determined before the first visit.
    pub async fn enrich_all(&self, items: &mut [Item]) -> Result<EnrichmentSummary, ScrapeError> {
        let home = self.renderer.current_context().await?;
        let total = items.len();
        let mut summary = EnrichmentSummary::default();

        for (index, item) in items.iter_mut().enumerate() {
            tracing::info!(
                item = index + 1,
                total,
                title = item.title_fragment(TITLE_LOG_CHARS),
                "reading sizes"
            );

            let outcome =
                with_detail_context(self.renderer, &home, &item.url, move || self.read_sizes())
                    .await;

            let sizes = match outcome {
                Ok(Ok(sizes)) => sizes,
                Ok(Err(e)) | Err(e) => {
                    tracing::warn!(
                        title = item.title_fragment(TITLE_LOG_CHARS),
                        url = %item.url,
                        error = %e,
                        "could not read sizes"
                    );
                    summary.failed += 1;
                    Vec::new()
                }
            };

            if sizes.is_empty() {
                summary.without_sizes += 1;
            } else {
                summary.with_sizes += 1;
            }
            item.available_sizes = sizes;
        }

        tracing::info!(
            with_sizes = summary.with_sizes,
            without_sizes = summary.without_sizes,
            failed = summary.failed,
            "enrichment finished"
        );
        Ok(summary)
    }

    /// Sizes offered on the active detail page; empty when the page has no
    /// size picker.
    async fn read_sizes(&self) -> Result<Vec<String>, ScrapeError> {
        let selectors = &self.config.selectors;

        match wait_for(
            self.renderer,
            &selectors.size_selector,
            self.config.detail_wait,
            self.config.poll_interval,
        )
        .await
        {
            Ok(()) => {}
            Err(e @ ScrapeError::WaitTimeout { .. }) => {
                tracing::debug!(error = %e, "no size picker");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        }
        pause(self.config.settle_delay).await;

        let labels = self.renderer.find_all(&selectors.available_size).await?;
        let mut sizes = Vec::with_capacity(labels.len());
        for label in &labels {
            if let Some(size) = self.size_label(label).await? {
                push_unique(&mut sizes, size);
            }
        }
        Ok(sizes)
    }

    /// The input's `value`, falling back to the label's visible text.
    async fn size_label(&self, label: &R::Element) -> Result<Option<String>, ScrapeError> {
        let selectors = &self.config.selectors;

        if let Some(input) = self
            .renderer
            .find_first_within(label, &selectors.size_input)
            .await?
        {
            if let Some(value) = self.renderer.attribute(&input, "value").await? {
                let value = value.trim();
                if !value.is_empty() {
                    return Ok(Some(value.to_string()));
                }
            }
        }

        let Some(text_el) = self
            .renderer
            .find_first_within(label, &selectors.size_text)
            .await?
        else {
            return Ok(None);
        };
        let text = self.renderer.text(&text_el).await?;
        let text = text.trim();
        Ok((!text.is_empty()).then(|| text.to_string()))
    }
}

fn push_unique(sizes: &mut Vec<String>, size: String) {
    if !sizes.contains(&size) {
        sizes.push(size);
    }
}
