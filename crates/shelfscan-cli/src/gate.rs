//! Terminal prompts between scrape sessions.

use std::io::Write;

use async_trait::async_trait;
use shelfscan_scraper::{ScrapeError, SessionGate};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

const READY_PROMPT: &str =
    "Open the listing you want in the browser, then press ENTER to start scraping...";
const MORE_PROMPT: &str = "Scrape more items? (y/n): ";

/// [`SessionGate`] answered by the operator on a terminal.
pub(crate) struct TerminalGate<R, W> {
    input: R,
    output: W,
}

impl TerminalGate<BufReader<Stdin>, std::io::Stdout> {
    pub(crate) fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), std::io::stdout())
    }
}

impl<R, W> TerminalGate<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `question` and returns `true` for an answer of `y` or `yes`.
    pub(crate) async fn confirm(&mut self, question: &str) -> std::io::Result<bool> {
        let answer = self.prompt(question).await?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    async fn prompt(&mut self, message: &str) -> std::io::Result<String> {
        write!(self.output, "{message}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim().to_string())
    }
}

#[async_trait]
impl<R, W> SessionGate for TerminalGate<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn ready_to_scrape(&mut self) -> Result<(), ScrapeError> {
        self.prompt(READY_PROMPT).await.map_err(ScrapeError::Gate)?;
        Ok(())
    }

    async fn scrape_more(&mut self) -> Result<bool, ScrapeError> {
        self.confirm(MORE_PROMPT).await.map_err(ScrapeError::Gate)
    }
}
