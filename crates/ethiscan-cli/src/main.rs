mod pages;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ethiscan-cli")]
#[command(about = "Extract product data from retailer pages and send it for analysis")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract a product record from a page and cache it as the last extraction
    Extract {
        /// Page URL; also used for platform detection and relative links
        #[arg(long)]
        url: String,
        /// Read the page HTML from this file instead of fetching `--url`
        #[arg(long)]
        file: Option<PathBuf>,
        /// Delay before extracting (defaults to ETHISCAN_SETTLE_DELAY_MS for fetched pages, 0 for files)
        #[arg(long)]
        settle_ms: Option<u64>,
    },
    /// Extract a page and forward the record to the analysis service
    Analyze {
        #[arg(long)]
        url: String,
        #[arg(long)]
        file: Option<PathBuf>,
        /// Override ETHISCAN_ANALYZE_ENDPOINT
        #[arg(long)]
        endpoint: Option<String>,
    },
    /// Print the last successful extraction
    Last,
    /// Print the platform a hostname or URL maps to
    Detect {
        /// Hostname (`www.amazon.in`) or full URL
        target: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ethiscan_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Extract {
            url,
            file,
            settle_ms,
        }) => pages::run_extract(&config, &url, file.as_deref(), settle_ms).await?,
        Some(Commands::Analyze {
            url,
            file,
            endpoint,
        }) => pages::run_analyze(&config, &url, file.as_deref(), endpoint.as_deref()).await?,
        Some(Commands::Last) => pages::run_last(&config)?,
        Some(Commands::Detect { target }) => println!("{}", pages::detect_target(&target)),
        None => println!("ethiscan-cli: run with --help to list commands"),
    }

    Ok(())
}
