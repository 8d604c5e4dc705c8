//! The `scrape` command: launch the browser, run sessions until the operator
//! stops, then save everything collected.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use shelfscan_core::{validate_start_url, Accumulator, ScrapeConfig};
use shelfscan_scraper::{run_sessions, SessionRunner, WebDriverRenderer};
use shelfscan_store::{ResultStore, SaveOutcome};

use crate::gate::TerminalGate;

const CLOSE_PROMPT: &str = "Close the browser? (y/n): ";

#[derive(Debug, Args)]
pub(crate) struct ScrapeArgs {
    /// Page opened at the start of every session
    #[arg(long)]
    pub start_url: Option<String>,

    /// Where to write the collected items
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Directory for the backup file if the output cannot be written
    #[arg(long)]
    pub backup_dir: Option<PathBuf>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// WebDriver server to start the browser through
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Quit the browser when done instead of asking
    #[arg(long)]
    pub close_browser: bool,
}

impl ScrapeArgs {
    /// Overrides `config` with the flags that were given.
    pub(crate) fn apply(&self, config: &mut ScrapeConfig) -> anyhow::Result<()> {
        if let Some(url) = &self.start_url {
            validate_start_url(url).context("invalid --start-url")?;
            config.start_url.clone_from(url);
        }
        if let Some(output) = &self.output {
            config.output_path.clone_from(output);
        }
        if let Some(dir) = &self.backup_dir {
            config.backup_dir.clone_from(dir);
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url.clone_from(url);
        }
        if self.headless {
            config.headless = true;
        }
        Ok(())
    }
}

/// Runs the interactive scrape.
///
/// # Errors
///
/// Returns an error if the browser cannot be started or the items can be
/// written neither to the output path nor to the backup directory.
pub(crate) async fn run_scrape(config: &ScrapeConfig, close_browser: bool) -> anyhow::Result<()> {
    let renderer = WebDriverRenderer::launch(&config.webdriver_url, config.headless)
        .await
        .context("browser could not be started")?;

    let mut gate = TerminalGate::stdio();
    let mut accumulator = Accumulator::new();

    let runner = SessionRunner::new(&renderer, config);
    let run = run_sessions(&runner, &mut gate, &mut accumulator).await;
    if run.gate_error.is_some() {
        tracing::warn!(
            sessions = run.sessions,
            "saving what was collected before the prompt failed"
        );
    }

    println!();
    println!("sessions:         {}", run.sessions);
    println!("total items:      {}", accumulator.len());
    println!("items with sizes: {}", accumulator.with_sizes_count());

    let saved = save_items(config, &accumulator).await;

    let quit = close_browser || ask_close(&mut gate).await;
    if quit {
        if let Err(e) = renderer.quit().await {
            tracing::warn!(error = %e, "failed to quit browser");
        }
    } else {
        renderer.detach();
        println!("browser left open");
    }

    saved
}

async fn save_items(config: &ScrapeConfig, accumulator: &Accumulator) -> anyhow::Result<()> {
    if accumulator.is_empty() {
        println!("no items were collected");
        return Ok(());
    }

    let store = ResultStore::new(&config.output_path, &config.backup_dir);
    match store.save(accumulator.items()).await? {
        SaveOutcome::Primary(path) => println!("saved to {}", path.display()),
        SaveOutcome::Backup {
            path,
            primary_error,
        } => println!(
            "could not write {} ({primary_error}); saved backup to {}",
            store.primary().display(),
            path.display()
        ),
    }
    Ok(())
}

async fn ask_close<R, W>(gate: &mut TerminalGate<R, W>) -> bool
where
    R: tokio::io::AsyncBufRead + Unpin + Send,
    W: std::io::Write + Send,
{
    match gate.confirm(CLOSE_PROMPT).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(error = %e, "no answer; leaving browser open");
            false
        }
    }
}
