//! Explicit waits: poll the page until an element shows up or a deadline passes.
//!
//! Pages render asynchronously, so every place that needs an element to exist
//! polls for it instead of sleeping and assuming it is there.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::ScrapeError;
use crate::renderer::Renderer;

/// Polls until any of `selectors` matches at least one element.
///
/// Selectors are checked in order on every poll. The page is always checked
/// at least once, even with a zero `timeout`. A `timeout` too large to be
/// represented as a deadline waits without one.
///
/// # Errors
///
/// - [`ScrapeError::WaitTimeout`] if nothing matched before `timeout` elapsed.
/// - [`ScrapeError::Render`] if the renderer fails while polling.
pub async fn wait_for_any<R: Renderer>(
    renderer: &R,
    selectors: &[&str],
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), ScrapeError> {
    let deadline = Instant::now().checked_add(timeout);

    loop {
        for selector in selectors {
            if !renderer.find_all(selector).await?.is_empty() {
                return Ok(());
            }
        }

        let Some(deadline) = deadline else {
            tokio::time::sleep(poll_interval).await;
            continue;
        };

        let now = Instant::now();
        if now >= deadline {
            return Err(ScrapeError::WaitTimeout {
                selector: selectors.join(" | "),
                timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            });
        }

        tokio::time::sleep(poll_interval.min(deadline - now)).await;
    }
}

/// Single-selector form of [`wait_for_any`].
///
/// # Errors
///
/// Same as [`wait_for_any`].
pub async fn wait_for<R: Renderer>(
    renderer: &R,
    selector: &str,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<(), ScrapeError> {
    wait_for_any(renderer, &[selector], timeout, poll_interval).await
}
