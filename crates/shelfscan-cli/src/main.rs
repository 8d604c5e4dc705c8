mod gate;
mod scrape;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::scrape::ScrapeArgs;

#[derive(Debug, Parser)]
#[command(name = "shelfscan")]
#[command(about = "Operator-driven storefront scraper")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape listing pages in operator-gated sessions and save the items as JSON
    Scrape(ScrapeArgs),
    /// Print the effective configuration and exit
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = shelfscan_core::load_scrape_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(Commands::Scrape(args)) => {
            args.apply(&mut config)?;
            scrape::run_scrape(&config, args.close_browser).await?;
        }
        Some(Commands::Config) => print_config(&config),
        None => Cli::command().print_help()?,
    }

    Ok(())
}

fn print_config(config: &shelfscan_core::ScrapeConfig) {
    println!("start_url:      {}", config.start_url);
    println!("output_path:    {}", config.output_path.display());
    println!("backup_dir:     {}", config.backup_dir.display());
    println!("webdriver_url:  {}", config.webdriver_url);
    println!("headless:       {}", config.headless);
    println!("log_level:      {}", config.log_level);
    println!("page_wait:      {:?}", config.page_wait);
    println!("scroll_pause:   {:?}", config.scroll_pause);
    println!("detail_wait:    {:?}", config.detail_wait);
    println!("settle_delay:   {:?}", config.settle_delay);
    println!("poll_interval:  {:?}", config.poll_interval);
    println!("card selectors: {}", config.selectors.card);
}
