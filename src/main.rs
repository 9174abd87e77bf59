//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl site crawler.

use anyhow::Context;
use clap::Parser;
use ripple_crawl::config::{load_config_or_default, validate_workers, Config};
use ripple_crawl::crawler::crawl;
use ripple_crawl::output::{print_report, ConsoleReporter};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Ripple-Crawl: a resumable same-site crawler
///
/// Ripple-Crawl starts from a seed page, follows links within the seed's
/// origin, prints the paragraph text of every page it fetches and saves its
/// progress so an interrupted crawl resumes where it stopped.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version)]
#[command(about = "A resumable same-site crawler", long_about = None)]
struct Cli {
    /// Absolute URL to start crawling from
    #[arg(value_name = "SEED_URL")]
    seed: String,

    /// Number of pages fetched in parallel
    #[arg(value_name = "WORKERS")]
    workers: usize,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for the crawl state file (overrides the config file)
    #[arg(long, value_name = "DIR")]
    state_dir: Option<String>,

    /// Start a fresh crawl, ignoring previous state
    #[arg(long)]
    fresh: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let cancel = CancellationToken::new();
    let force_stop = CancellationToken::new();
    spawn_signal_handler(cancel.clone(), force_stop.clone())
        .context("failed to install shutdown signal handlers")?;

    if cli.fresh {
        tracing::info!("Starting fresh crawl (ignoring previous state)");
    } else {
        tracing::info!("Starting crawl (will resume if saved state exists)");
    }

    let report = match crawl(
        &cli.seed,
        &config,
        cli.fresh,
        Arc::new(ConsoleReporter),
        cancel,
        force_stop,
    )
    .await
    {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    println!();
    print_report(&report);

    Ok(())
}

/// Loads the configuration file and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }

    let mut config = load_config_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;

    validate_workers(cli.workers).context("invalid WORKERS argument")?;
    config.crawler.workers = cli.workers;

    if let Some(dir) = &cli.state_dir {
        config.output.state_dir = dir.clone();
    }

    Ok(config)
}

/// Listens for the signals that stop a crawl: Ctrl-C everywhere, plus
/// SIGTERM on Unix
struct ShutdownSignals {
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    fn new() -> std::io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: tokio::signal::unix::signal(
                tokio::signal::unix::SignalKind::terminate(),
            )?,
        })
    }

    /// Waits for the next stop signal
    #[cfg(unix)]
    async fn recv(&mut self) -> std::io::Result<()> {
        tokio::select! {
            result = tokio::signal::ctrl_c() => result,
            _ = self.terminate.recv() => Ok(()),
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) -> std::io::Result<()> {
        tokio::signal::ctrl_c().await
    }
}

/// Cancels `cancel` on the first stop signal and `force_stop` on the second
///
/// Listeners are installed before this returns, so a signal arriving while
/// the crawl starts up is not lost to the default handler.
fn spawn_signal_handler(
    cancel: CancellationToken,
    force_stop: CancellationToken,
) -> std::io::Result<()> {
    let mut signals = ShutdownSignals::new()?;

    tokio::spawn(async move {
        if let Err(e) = signals.recv().await {
            tracing::error!("Failed to listen for shutdown signals: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received, stopping crawl (signal again to stop now)");
        cancel.cancel();

        if signals.recv().await.is_ok() {
            tracing::warn!("Second shutdown signal, abandoning in-flight pages");
            force_stop.cancel();
        }
    });

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout carries only crawl progress and the report.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
