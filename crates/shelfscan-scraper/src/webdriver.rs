//! [`Renderer`] backed by a real browser through WebDriver.

use async_trait::async_trait;
use thirtyfour::prelude::*;
use thirtyfour::{ChromiumLikeCapabilities, WindowHandle};

use crate::error::{RenderError, ScrapeError};
use crate::renderer::Renderer;

impl From<WebDriverError> for RenderError {
    fn from(e: WebDriverError) -> Self {
        RenderError::Driver(e.to_string())
    }
}

pub struct WebDriverRenderer {
    driver: WebDriver,
}

impl WebDriverRenderer {
    /// Starts a Chrome session through the WebDriver server at
    /// `webdriver_url`, maximized and optionally headless.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Launch`] if the capabilities are rejected or
    /// the server cannot start a session.
    pub async fn launch(webdriver_url: &str, headless: bool) -> Result<Self, ScrapeError> {
        let launch_err = |e: WebDriverError| ScrapeError::Launch {
            webdriver_url: webdriver_url.to_string(),
            reason: e.to_string(),
        };

        let mut caps = DesiredCapabilities::chrome();
        caps.add_arg("--start-maximized").map_err(launch_err)?;
        if headless {
            caps.add_arg("--headless=new").map_err(launch_err)?;
        }

        let driver = WebDriver::new(webdriver_url, caps)
            .await
            .map_err(launch_err)?;
        tracing::info!(webdriver_url, headless, "browser session started");
        Ok(Self { driver })
    }

    /// Ends the browser session.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Driver`] if the driver rejects the request.
    pub async fn quit(self) -> Result<(), RenderError> {
        self.driver.quit().await?;
        Ok(())
    }

    /// Lets go of the session without ending it, leaving the browser open
    /// for the operator.
    pub fn detach(self) {
        if let Err(e) = self.driver.leak() {
            tracing::warn!(error = %e, "failed to detach from browser session");
        }
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    type Element = WebElement;
    type Context = WindowHandle;

    async fn navigate(&self, url: &str) -> Result<(), RenderError> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn execute(&self, script: &str) -> Result<serde_json::Value, RenderError> {
        let ret = self
            .driver
            .execute(script, Vec::new())
            .await
            .map_err(|e| RenderError::Script(e.to_string()))?;
        Ok(ret.json().clone())
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<WebElement>, RenderError> {
        Ok(self.driver.find_all(By::Css(selector)).await?)
    }

    async fn find_all_within(
        &self,
        parent: &WebElement,
        selector: &str,
    ) -> Result<Vec<WebElement>, RenderError> {
        Ok(parent.find_all(By::Css(selector)).await?)
    }

    async fn text(&self, element: &WebElement) -> Result<String, RenderError> {
        Ok(element.text().await?)
    }

    async fn attribute(
        &self,
        element: &WebElement,
        name: &str,
    ) -> Result<Option<String>, RenderError> {
        Ok(element.attr(name).await?)
    }

    async fn click(&self, element: &WebElement) -> Result<(), RenderError> {
        element.click().await?;
        Ok(())
    }

    async fn scroll_into_view(&self, element: &WebElement) -> Result<(), RenderError> {
        element.scroll_into_view().await?;
        Ok(())
    }

    async fn current_context(&self) -> Result<WindowHandle, RenderError> {
        Ok(self.driver.window().await?)
    }

    async fn open_context(&self, url: &str) -> Result<WindowHandle, RenderError> {
        let context_err = |e: WebDriverError| RenderError::Context(e.to_string());

        let tab = self.driver.new_tab().await.map_err(context_err)?;
        self.driver
            .switch_to_window(tab.clone())
            .await
            .map_err(context_err)?;

        if let Err(e) = self.driver.goto(url).await {
            if let Err(close_err) = self.driver.close_window().await {
                tracing::warn!(url, error = %close_err, "failed to close tab after navigation error");
            }
            return Err(e.into());
        }
        Ok(tab)
    }

    async fn switch_context(&self, context: &WindowHandle) -> Result<(), RenderError> {
        self.driver
            .switch_to_window(context.clone())
            .await
            .map_err(|e| RenderError::Context(e.to_string()))
    }

    async fn close_context(&self, context: &WindowHandle) -> Result<(), RenderError> {
        let context_err = |e: WebDriverError| RenderError::Context(e.to_string());
        self.driver
            .switch_to_window(context.clone())
            .await
            .map_err(context_err)?;
        self.driver.close_window().await.map_err(context_err)
    }
}
