//! Scoped detail contexts.
//!
//! Every detail page is read in its own browsing context. However the work
//! inside ends, the context is closed and the listing context becomes active
//! again before the next step runs.

use std::future::Future;

use crate::error::ScrapeError;
use crate::renderer::Renderer;

/// Opens `url` in a fresh context, runs `task` there, then closes the context
/// and switches back to `home`.
///
/// The task's own result is returned unchanged once the browser is back on
/// `home`. A failure to close the detail context is only logged; the switch
/// back is what later steps depend on.
///
/// # Errors
///
/// - [`ScrapeError::Render`] if the context cannot be opened, or the browser
///   cannot be switched back to `home`.
pub async fn with_detail_context<R, T, F, Fut>(
    renderer: &R,
    home: &R::Context,
    url: &str,
    task: F,
) -> Result<T, ScrapeError>
where
    R: Renderer,
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let detail = match renderer.open_context(url).await {
        Ok(context) => context,
        Err(e) => {
            // Some drivers leave a half-open tab focused.
            if let Err(switch_err) = renderer.switch_context(home).await {
                tracing::warn!(error = %switch_err, "could not return to the listing context");
            }
            return Err(e.into());
        }
    };

    let outcome = task().await;

    if let Err(e) = renderer.close_context(&detail).await {
        tracing::warn!(context = ?detail, error = %e, "failed to close detail context");
    }
    renderer.switch_context(home).await?;

    Ok(outcome)
}
