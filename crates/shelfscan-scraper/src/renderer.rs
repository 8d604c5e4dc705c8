//! The browser seam.
//!
//! Everything the scraper needs from a browser goes through [`Renderer`], so
//! extraction, pagination, and enrichment can run against a real WebDriver
//! session or an in-memory page.

use async_trait::async_trait;

use crate::error::RenderError;

#[async_trait]
pub trait Renderer: Send + Sync {
    /// Handle to an element of the active browsing context.
    type Element: Send + Sync;
    /// Handle to a browsing context (a tab or window).
    type Context: Clone + std::fmt::Debug + Send + Sync;

    async fn navigate(&self, url: &str) -> Result<(), RenderError>;

    /// Runs `script` in the active context and returns its JSON result.
    async fn execute(&self, script: &str) -> Result<serde_json::Value, RenderError>;

    /// All elements matching a CSS selector, in document order. An empty
    /// `Vec` means no match, not an error.
    async fn find_all(&self, selector: &str) -> Result<Vec<Self::Element>, RenderError>;

    async fn find_all_within(
        &self,
        parent: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, RenderError>;

    /// Rendered text of an element, as the user sees it.
    async fn text(&self, element: &Self::Element) -> Result<String, RenderError>;

    async fn attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, RenderError>;

    async fn click(&self, element: &Self::Element) -> Result<(), RenderError>;

    async fn scroll_into_view(&self, element: &Self::Element) -> Result<(), RenderError>;

    async fn current_context(&self) -> Result<Self::Context, RenderError>;

    /// Opens `url` in a new browsing context and makes it the active one.
    async fn open_context(&self, url: &str) -> Result<Self::Context, RenderError>;

    async fn switch_context(&self, context: &Self::Context) -> Result<(), RenderError>;

    /// Closes `context`. Callers must switch to another context afterwards.
    async fn close_context(&self, context: &Self::Context) -> Result<(), RenderError>;

    async fn find_first(&self, selector: &str) -> Result<Option<Self::Element>, RenderError> {
        Ok(self.find_all(selector).await?.into_iter().next())
    }

    async fn find_first_within(
        &self,
        parent: &Self::Element,
        selector: &str,
    ) -> Result<Option<Self::Element>, RenderError> {
        Ok(self
            .find_all_within(parent, selector)
            .await?
            .into_iter()
            .next())
    }
}
