//! Page-Lens main entry point
//!
//! This is the command-line interface for the Page-Lens single-page analyzer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use page_lens::analyzer::analyze_page;
use page_lens::config::{load_config, validate, Config};
use page_lens::output::{render, OutputFormat};
use page_lens::server;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Page-Lens: a single-page web analyzer
///
/// Page-Lens fetches one page and reports its HTML version, title, heading
/// histogram, link reachability counts and whether it contains a login form.
#[derive(Parser, Debug)]
#[command(name = "page-lens")]
#[command(version)]
#[command(about = "A single-page web analyzer", long_about = None)]
struct Cli {
    /// URL of the page to analyze
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve `POST /analyze` and `GET /health` over HTTP
    Serve {
        /// Listen address, overriding `[server] bind`
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(Command::Serve { bind }) = cli.command {
        if let Some(bind) = bind {
            config.server.bind = bind;
        }
        validate(&config).context("invalid server configuration")?;

        tracing::info!("Starting HTTP service on {}", config.server.bind);
        server::serve(config, shutdown_signal())
            .await
            .context("HTTP service failed")?;
        return Ok(());
    }

    let Some(url) = cli.url else {
        anyhow::bail!("a URL to analyze is required");
    };

    let result = match analyze_page(&url, &config).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Analysis failed: {}", e);
            return Err(e).with_context(|| format!("failed to analyze {}", url));
        }
    };

    let rendered = render(&result, cli.format, cli.pretty).context("failed to render result")?;
    println!("{}", rendered);

    Ok(())
}

/// Resolves on Ctrl+C so the service can drain in-flight requests
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout only carries the rendered result.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_lens=info,warn"),
            1 => EnvFilter::new("page_lens=debug,info"),
            2 => EnvFilter::new("page_lens=trace,debug"),
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
