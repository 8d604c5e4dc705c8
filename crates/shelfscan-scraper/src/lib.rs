pub mod cards;
pub mod context;
pub mod enrich;
pub mod error;
pub mod pagination;
pub mod renderer;
pub mod session;
pub mod wait;
pub mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

pub use cards::CardExtractor;
pub use enrich::{DetailEnricher, EnrichmentSummary};
pub use error::{RenderError, ScrapeError};
pub use pagination::Paginator;
pub use renderer::Renderer;
pub use session::{run_sessions, SessionGate, SessionResult, SessionRunner, SessionsRun};
pub use webdriver::WebDriverRenderer;
