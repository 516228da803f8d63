use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eduscout::cache::SnapshotStore;
use eduscout::config::Config;
use eduscout::fetcher::PageFetcher;
use eduscout::scheduler::{CycleOutcome, RefreshScheduler};
use eduscout::server::ApiServer;
use eduscout::source::{ConferenceSource, CourseSource};

#[derive(Parser)]
#[command(
    name = "eduscout",
    version,
    about = "Course and conference listing aggregator with a daily-refresh cache and read API",
    long_about = None
)]
struct Cli {
    /// Path to a TOML config file (environment variables used otherwise)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address (e.g. 127.0.0.1:3001)
    #[arg(short, long)]
    bind: Option<std::net::SocketAddr>,

    /// Run a single refresh cycle, print record counts, and exit
    #[arg(long)]
    once: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, default_value = "text")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    config.validate()?;

    tracing::info!("eduscout starting");

    let store = Arc::new(SnapshotStore::new());
    let fetcher = Arc::new(PageFetcher::new(
        config.request_timeout(),
        config.fetcher.user_agent.clone(),
    )?);
    let courses = CourseSource::new(
        fetcher.clone(),
        config.sources.courses.clone(),
        &config.fetcher,
    );
    let conferences = ConferenceSource::new(
        fetcher,
        config.sources.conferences.clone(),
        &config.fetcher,
    );
    let scheduler = Arc::new(RefreshScheduler::new(
        store.clone(),
        courses,
        conferences,
        &config.refresh,
    )?);

    if cli.once {
        return run_once(&scheduler).await;
    }

    // Boot refresh runs before the query surface comes up, so the first
    // requests see a populated cache when the sources are reachable.
    if config.refresh.refresh_on_startup {
        scheduler.run_cycle().await;
    }

    let scheduler_loop = scheduler.clone();
    tokio::spawn(async move {
        scheduler_loop.start().await;
    });

    let server = ApiServer::new(config.server, store);
    server
        .start_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    scheduler.stop().await;
    tracing::info!("eduscout stopped");
    Ok(())
}

async fn run_once(scheduler: &RefreshScheduler) -> Result<()> {
    match scheduler.run_cycle().await {
        CycleOutcome::Completed(report) => {
            println!(
                "courses: {} extracted, cache {}",
                report.courses.extracted,
                if report.courses.updated { "updated" } else { "kept" }
            );
            println!(
                "conferences: {} extracted, cache {}",
                report.conferences.extracted,
                if report.conferences.updated { "updated" } else { "kept" }
            );
            Ok(())
        }
        CycleOutcome::Skipped => anyhow::bail!("refresh cycle was skipped"),
    }
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("eduscout=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("eduscout=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    Ok(())
}
