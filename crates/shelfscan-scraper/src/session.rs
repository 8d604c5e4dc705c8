//! Scrape sessions: walk every listing page, enrich what was found, and fold
//! the result into the run's accumulator.
//!
//! The operator drives the run. Before each session they get a chance to
//! navigate the browser (a category, a filter) and after it they decide
//! whether to go again. [`SessionGate`] is that hook.

use std::collections::HashSet;

use async_trait::async_trait;
use shelfscan_core::{Accumulator, Item, ScrapeConfig};

use crate::cards::CardExtractor;
use crate::enrich::{DetailEnricher, EnrichmentSummary};
use crate::error::ScrapeError;
use crate::pagination::{Paginator, MAX_PAGES};
use crate::renderer::Renderer;

/// Operator checkpoints between sessions.
#[async_trait]
pub trait SessionGate: Send {
    /// Blocks until the operator has the listing they want on screen.
    async fn ready_to_scrape(&mut self) -> Result<(), ScrapeError>;

    /// Asks whether another session should run.
    async fn scrape_more(&mut self) -> Result<bool, ScrapeError>;
}

#[derive(Debug)]
pub struct SessionResult {
    /// Items in listing order, unique by URL, sizes filled in.
    pub items: Vec<Item>,
    /// Listing pages whose cards were read.
    pub pages: u32,
    pub enrichment: EnrichmentSummary,
    /// The error that cut pagination short. Items read before it are kept.
    pub interrupted_by: Option<ScrapeError>,
    /// The error that prevented any detail page from being visited. The
    /// items are kept without sizes.
    pub enrichment_error: Option<ScrapeError>,
}

/// How a run of sessions ended.
#[derive(Debug)]
pub struct SessionsRun {
    /// Sessions whose items were scraped (and merged, if any were found).
    pub sessions: u32,
    /// The prompt failure that stopped the run, if it did not end with the
    /// operator declining another session.
    pub gate_error: Option<ScrapeError>,
}

pub struct SessionRunner<'a, R: Renderer> {
    renderer: &'a R,
    config: &'a ScrapeConfig,
}

impl<'a, R: Renderer> SessionRunner<'a, R> {
    #[must_use]
    pub fn new(renderer: &'a R, config: &'a ScrapeConfig) -> Self {
        Self { renderer, config }
    }

    /// Points the browser at the start URL. Returns `false` if that failed;
    /// the operator can still navigate by hand.
    pub async fn navigate_to_start(&self) -> bool {
        match self.renderer.navigate(&self.config.start_url).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    url = %self.config.start_url,
                    error = %e,
                    "could not open start URL; navigate manually"
                );
                false
            }
        }
    }

    /// Reads every listing page reachable from the current one, then visits
    /// each collected item's detail page.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidUrl`] if the configured start URL is
    /// unusable as a base for product links.
    ///
    /// Errors during pagination or enrichment do not fail the session; they
    /// are reported in [`SessionResult::interrupted_by`] and
    /// [`SessionResult::enrichment_error`].
    pub async fn run_session(&self) -> Result<SessionResult, ScrapeError> {
        let extractor = CardExtractor::new(self.renderer, self.config)?;
        let paginator = Paginator::new(self.renderer, self.config);

        let mut items = Vec::new();
        let mut pages = 0u32;
        let interrupted_by = self
            .paginate(&extractor, &paginator, &mut items, &mut pages)
            .await
            .err();

        if let Some(e) = &interrupted_by {
            tracing::warn!(
                page = pages + 1,
                collected = items.len(),
                error = %e,
                "pagination ended early; keeping items collected so far"
            );
        }

        let mut items = unique_by_url(items);
        tracing::info!(pages, items = items.len(), "listing pass finished");

        let (enrichment, enrichment_error) = match DetailEnricher::new(self.renderer, self.config)
            .enrich_all(&mut items)
            .await
        {
            Ok(summary) => (summary, None),
            Err(e) => {
                tracing::warn!(
                    items = items.len(),
                    error = %e,
                    "could not start enrichment; keeping items without sizes"
                );
                for item in &mut items {
                    item.available_sizes.clear();
                }
                let summary = EnrichmentSummary {
                    with_sizes: 0,
                    without_sizes: items.len(),
                    failed: items.len(),
                };
                (summary, Some(e))
            }
        };

        Ok(SessionResult {
            items,
            pages,
            enrichment,
            interrupted_by,
            enrichment_error,
        })
    }

    async fn paginate(
        &self,
        extractor: &CardExtractor<'_, R>,
        paginator: &Paginator<'_, R>,
        items: &mut Vec<Item>,
        pages: &mut u32,
    ) -> Result<(), ScrapeError> {
        loop {
            let page = *pages + 1;

            extractor.wait_for_cards().await?;
            paginator.scroll_to_end().await?;
            let added = extractor.extract_into(items).await?;
            *pages = page;
            tracing::info!(page, added, total = items.len(), "page scraped");

            if page >= MAX_PAGES {
                tracing::warn!(max_pages = MAX_PAGES, "reached page limit; stopping pagination");
                return Ok(());
            }
            if !paginator.advance().await {
                tracing::info!(page, "no more pages");
                return Ok(());
            }
        }
    }
}

/// Drops repeated URLs, keeping the first occurrence.
fn unique_by_url(items: Vec<Item>) -> Vec<Item> {
    let before = items.len();
    let mut seen = HashSet::with_capacity(before);
    let unique: Vec<Item> = items
        .into_iter()
        .filter(|item| seen.insert(item.url.clone()))
        .collect();
    if unique.len() < before {
        tracing::debug!(
            duplicates = before - unique.len(),
            "dropped repeated listings within session"
        );
    }
    unique
}

/// Runs sessions until the operator declines another one. Each session's
/// items are merged into `accumulator`; an earlier item wins over a later one
/// with the same URL.
///
/// A failing operator prompt stops the run. It is reported in
/// [`SessionsRun::gate_error`] next to the number of sessions that ran; items
/// merged before it stay in `accumulator`.
pub async fn run_sessions<R, G>(
    runner: &SessionRunner<'_, R>,
    gate: &mut G,
    accumulator: &mut Accumulator,
) -> SessionsRun
where
    R: Renderer,
    G: SessionGate + ?Sized,
{
    let mut sessions = 0u32;
    let stopped = |sessions: u32, e: ScrapeError| {
        tracing::error!(sessions, error = %e, "operator prompt failed; stopping");
        SessionsRun {
            sessions,
            gate_error: Some(e),
        }
    };

    loop {
        runner.navigate_to_start().await;
        if let Err(e) = gate.ready_to_scrape().await {
            return stopped(sessions, e);
        }
        sessions += 1;

        match runner.run_session().await {
            Ok(result) => {
                let stats = accumulator.merge(result.items);
                tracing::info!(
                    session = sessions,
                    pages = result.pages,
                    added = stats.added,
                    discarded = stats.discarded,
                    total = accumulator.len(),
                    "session merged"
                );
            }
            Err(e) => {
                tracing::error!(session = sessions, error = %e, "session failed");
            }
        }

        match gate.scrape_more().await {
            Ok(true) => {}
            Ok(false) => {
                return SessionsRun {
                    sessions,
                    gate_error: None,
                }
            }
            Err(e) => return stopped(sessions, e),
        }
    }
}
