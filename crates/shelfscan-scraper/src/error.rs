use thiserror::Error;

/// Failures reported by a [`Renderer`](crate::Renderer) implementation.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The browser or its driver rejected a command.
    #[error("webdriver error: {0}")]
    Driver(String),

    #[error("script error: {0}")]
    Script(String),

    /// A browsing context (tab) could not be opened, switched to, or closed.
    #[error("browsing context error: {0}")]
    Context(String),
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Nothing matched within the wait budget. Expected on pages that simply
    /// lack the element (e.g. a product without a size picker).
    #[error("timed out after {timeout_ms}ms waiting for {selector}")]
    WaitTimeout { selector: String, timeout_ms: u64 },

    #[error("card has no {field}")]
    MissingField { field: &'static str },

    #[error("invalid product URL \"{href}\": {reason}")]
    InvalidUrl { href: String, reason: String },

    #[error("unexpected result from `{script}`: {value}")]
    UnexpectedScriptResult { script: &'static str, value: String },

    #[error("failed to launch browser via {webdriver_url}: {reason}")]
    Launch {
        webdriver_url: String,
        reason: String,
    },

    #[error("operator prompt failed: {0}")]
    Gate(std::io::Error),
}

impl ScrapeError {
    /// Returns `true` for absences the scraper plans for (missing element,
    /// missing card field) as opposed to browser or driver failures.
    #[must_use]
    pub fn is_expected_absence(&self) -> bool {
        matches!(
            self,
            ScrapeError::WaitTimeout { .. } | ScrapeError::MissingField { .. }
        )
    }
}
