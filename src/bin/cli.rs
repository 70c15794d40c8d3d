//! wordcrawl CLI
//!
//! Crawls the configured article list and prints the most frequent
//! vocabulary words as JSON.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use wordcrawl::{
    error::Result,
    models::{Config, TopWordsResponse},
    pipeline,
};

/// wordcrawl - Top vocabulary words across a list of articles
#[derive(Parser, Debug)]
#[command(name = "wordcrawl", version, about = "Top vocabulary words across a list of articles")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "storage/config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the articles and print the top words
    Top(TopArgs),

    /// Validate the configuration file
    Validate,
}

/// Command-line overrides for the configuration file.
#[derive(Args, Debug)]
struct TopArgs {
    /// Requests per second across all workers
    #[arg(long)]
    rps: Option<f64>,

    /// Number of parallel workers
    #[arg(long)]
    workers: Option<usize>,

    /// Amount of top words to show
    #[arg(short)]
    n: Option<usize>,

    /// Log progress every N articles (0 disables)
    #[arg(long)]
    progress: Option<usize>,

    /// Process only the first N articles (0 processes all)
    #[arg(long)]
    batch_size: Option<usize>,

    /// URL of the article list
    #[arg(long)]
    articles_url: Option<String>,

    /// URL of the bank of words
    #[arg(long)]
    bank_of_words_url: Option<String>,

    /// Directory for cached input lists
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Status code the article host uses for throttling
    #[arg(long)]
    throttle_status: Option<u16>,
}

impl TopArgs {
    fn apply(self, config: &mut Config) {
        if let Some(rps) = self.rps {
            config.crawler.rps = rps;
        }
        if let Some(workers) = self.workers {
            config.crawler.workers = workers;
        }
        if let Some(progress) = self.progress {
            config.crawler.progress = progress;
        }
        if let Some(status) = self.throttle_status {
            config.crawler.throttle_status = status;
        }
        if let Some(n) = self.n {
            config.output.top_n = n;
        }
        if let Some(batch_size) = self.batch_size {
            config.output.batch_size = batch_size;
        }
        if let Some(url) = self.articles_url {
            config.sources.articles_url = url;
        }
        if let Some(url) = self.bank_of_words_url {
            config.sources.bank_of_words_url = url;
        }
        if let Some(dir) = self.cache_dir {
            config.sources.cache_dir = dir;
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_or_default(&cli.config);

    match cli.command {
        Command::Top(args) => {
            args.apply(&mut config);

            let report = pipeline::run_top_words(&config).await.map_err(|e| {
                log::error!("Error processing articles: {}", e);
                e
            })?;

            let response = TopWordsResponse { data: report.words };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK");
        }
    }

    Ok(())
}
