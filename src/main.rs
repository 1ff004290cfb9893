use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use spoiler_sync::application::{ReviewAnnotator, ReviewSettings, SyncPipeline, SyncSettings};
use spoiler_sync::domain::{BoardRepository, PageSource};
use spoiler_sync::infrastructure::{
    AppConfig, HttpClient, TrelloClient, init_logging_with_config, log_system_info,
};

#[derive(Parser)]
#[command(name = "spoiler-sync", version, about = "Sync card spoilers and set reviews to a Trello board")]
struct Cli {
    /// Path to a TOML config file (defaults to ./spoiler-sync.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level, overrides logging.level
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add spoilers that are not on the board yet
    Sync(SyncArgs),
    /// Post set review ratings as card comments
    Annotate(AnnotateArgs),
}

#[derive(Args)]
struct SyncArgs {
    /// Write to the board; without it the run only logs what it would do
    #[arg(long)]
    apply: bool,

    /// First spoiler listing page
    #[arg(long)]
    feed_url: Option<String>,

    /// Maximum number of new cards to add
    #[arg(long)]
    limit: Option<usize>,

    #[arg(long)]
    detail_concurrency: Option<usize>,

    #[arg(long)]
    apply_concurrency: Option<usize>,
}

#[derive(Args)]
struct AnnotateArgs {
    /// Write to the board; without it the run only logs what it would do
    #[arg(long)]
    apply: bool,

    /// Review article to scrape, repeatable; replaces the configured list
    #[arg(long = "review-url")]
    review_urls: Vec<String>,

    /// Maximum number of reviews to post
    #[arg(long)]
    limit: Option<usize>,

    #[arg(long)]
    apply_concurrency: Option<usize>,
}

impl Cli {
    /// Command line flags are the last configuration layer
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }

        match &self.command {
            Command::Sync(args) => {
                if args.apply {
                    config.pipeline.dry_run = false;
                }
                if let Some(url) = &args.feed_url {
                    config.feed.start_url.clone_from(url);
                }
                if args.limit.is_some() {
                    config.feed.max_new_cards = args.limit;
                }
                if let Some(n) = args.detail_concurrency {
                    config.pipeline.detail_concurrency = n;
                }
                if let Some(n) = args.apply_concurrency {
                    config.pipeline.apply_concurrency = n;
                }
            }
            Command::Annotate(args) => {
                if args.apply {
                    config.pipeline.dry_run = false;
                }
                if !args.review_urls.is_empty() {
                    config.reviews.urls.clone_from(&args.review_urls);
                }
                if args.limit.is_some() {
                    config.reviews.limit = args.limit;
                }
                if let Some(n) = args.apply_concurrency {
                    config.pipeline.apply_concurrency = n;
                }
            }
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

async fn run(command: &Command, config: &AppConfig) -> Result<()> {
    let board_id = config.board_id()?.to_string();
    let http = HttpClient::with_config(config.http.clone())?;
    let board: Arc<dyn BoardRepository> = Arc::new(TrelloClient::new(http.inner().clone(), &config.trello)?);
    let source: Arc<dyn PageSource> = Arc::new(http);

    match command {
        Command::Sync(_) => {
            let settings = SyncSettings::from_config(config, board_id);
            let pipeline = SyncPipeline::new(board, source, &config.parsing, settings)?;
            let report = pipeline.run().await?;
            info!(
                "Sync finished: {} new card(s) out of {} spoilers{}",
                report.new_cards,
                report.total_spoilers,
                if report.dry_run { " (dry run)" } else { "" }
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Annotate(_) => {
            let settings = ReviewSettings::from_config(config, board_id);
            let annotator = ReviewAnnotator::new(board, source, &config.parsing.review, settings)?;
            let report = annotator.run().await?;
            info!(
                "Annotation finished: {} review(s) matched{}",
                report.annotations.len(),
                if report.dry_run { " (dry run)" } else { "" }
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Legacy TRELLO_* / BOARD_ID variables usually live in .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("spoiler-sync: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging_with_config(&config.logging) {
        eprintln!("spoiler-sync: {e:#}");
        return ExitCode::FAILURE;
    }
    log_system_info();

    match run(&cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
