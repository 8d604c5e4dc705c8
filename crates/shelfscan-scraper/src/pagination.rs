//! Listing pagination: lazy-load scrolling and the next-page control.
//!
//! The listing renders more cards as the viewport nears the bottom, so a page
//! is scrolled until `document.body.scrollHeight` stops growing before its
//! cards are read. Moving on means clicking the next-page control and waiting
//! for the current-page marker; any trouble with that control ends pagination
//! instead of failing the session.

use std::time::Duration;

use shelfscan_core::ScrapeConfig;

use crate::error::ScrapeError;
use crate::renderer::Renderer;
use crate::wait::wait_for;

pub(crate) const SCROLL_HEIGHT_SCRIPT: &str = "return document.body.scrollHeight";
pub(crate) const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight)";

/// Maximum scroll steps on one page. Guards against feeds that never stop
/// growing.
pub const MAX_SCROLL_STEPS: usize = 200;

/// Maximum listing pages per session. Guards against a next-page control
/// that cycles back to an earlier page.
pub const MAX_PAGES: u32 = 500;

pub struct Paginator<'a, R: Renderer> {
    renderer: &'a R,
    config: &'a ScrapeConfig,
}

impl<'a, R: Renderer> Paginator<'a, R> {
    #[must_use]
    pub fn new(renderer: &'a R, config: &'a ScrapeConfig) -> Self {
        Self { renderer, config }
    }

    /// Scrolls to the bottom until two consecutive height readings match.
    ///
    /// Returns the number of scroll steps taken.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::Render`] if a script fails to run.
    /// - [`ScrapeError::UnexpectedScriptResult`] if the page height is not a number.
    pub async fn scroll_to_end(&self) -> Result<usize, ScrapeError> {
        let mut last_height = self.document_height().await?;

        for step in 1..=MAX_SCROLL_STEPS {
            self.renderer.execute(SCROLL_TO_BOTTOM_SCRIPT).await?;
            pause(self.config.scroll_pause).await;

            let height = self.document_height().await?;
            if height == last_height {
                tracing::debug!(steps = step, height, "page stopped growing");
                return Ok(step);
            }
            last_height = height;
        }

        tracing::warn!(
            max_steps = MAX_SCROLL_STEPS,
            height = last_height,
            "page kept growing; stopped scrolling at the step limit"
        );
        Ok(MAX_SCROLL_STEPS)
    }

    /// Moves to the next listing page.
    ///
    /// Returns `false` when there is no next page: the control is missing,
    /// flagged disabled, or anything about clicking it fails. A disabled
    /// control is never clicked.
    pub async fn advance(&self) -> bool {
        match self.try_advance().await {
            Ok(advanced) => advanced,
            Err(e) => {
                tracing::debug!(error = %e, "next-page control failed; treating as last page");
                false
            }
        }
    }

    async fn try_advance(&self) -> Result<bool, ScrapeError> {
        let selectors = &self.config.selectors;

        let Some(next) = self.renderer.find_first(&selectors.next_page).await? else {
            tracing::debug!("no next-page control");
            return Ok(false);
        };

        let aria_disabled = self.renderer.attribute(&next, "aria-disabled").await?;
        let disabled = self.renderer.attribute(&next, "disabled").await?;
        if is_disabled(aria_disabled.as_deref(), disabled.as_deref()) {
            tracing::debug!("next-page control is disabled");
            return Ok(false);
        }

        self.renderer.scroll_into_view(&next).await?;
        pause(self.config.settle_delay).await;
        self.renderer.click(&next).await?;

        wait_for(
            self.renderer,
            &selectors.current_page,
            self.config.page_wait,
            self.config.poll_interval,
        )
        .await?;

        Ok(true)
    }

    async fn document_height(&self) -> Result<u64, ScrapeError> {
        let value = self.renderer.execute(SCROLL_HEIGHT_SCRIPT).await?;
        parse_height(&value).ok_or_else(|| ScrapeError::UnexpectedScriptResult {
            script: SCROLL_HEIGHT_SCRIPT,
            value: value.to_string(),
        })
    }
}

/// `aria-disabled="true"` or any `disabled` attribute other than `"false"`.
fn is_disabled(aria_disabled: Option<&str>, disabled: Option<&str>) -> bool {
    let aria = aria_disabled.is_some_and(|v| v.trim().eq_ignore_ascii_case("true"));
    let attr = disabled.is_some_and(|v| !v.trim().eq_ignore_ascii_case("false"));
    aria || attr
}

fn parse_height(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) async fn pause(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
