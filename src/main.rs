use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;

use remora::channels::ConsoleChannel;
use remora::config::Config;
use remora::logging;
use remora::responder::{RefreshScheduler, Responder};
use remora::source::{KeywordSource, SheetCsvSource, StaticSource};

#[derive(Debug, Parser)]
#[command(
    name = "remora",
    version = concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("REMORA_GIT_HASH"), " ", env!("REMORA_BUILD_DATE"), ")"
    ),
    about = "Keyword autoresponder driven by a spreadsheet-backed reply table"
)]
struct Cli {
    /// Path to the JSON5 configuration file
    #[arg(short, long, default_value = "remora.json5")]
    config: PathBuf,

    /// Override the configured log filter (e.g. "debug" or "remora=trace")
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("remora: {}", e);
            std::process::exit(1);
        }
    };

    let mut logging_config = config.logging.clone();
    if let Some(level) = cli.log_level {
        logging_config.level = level;
    }
    if let Err(e) = logging::init(&logging_config) {
        eprintln!("remora: {}", e);
        std::process::exit(1);
    }

    // Load finished before the subscriber existed; emit pending findings now.
    config.log_warnings();

    tracing::info!(
        config = %cli.config.display(),
        refresh_interval_ms = config.refresh_interval_ms,
        "remora starting"
    );

    let responder = Arc::new(Responder::new(config.responder_settings()));

    let source: Arc<dyn KeywordSource> = match &config.sheet_csv_url {
        Some(url) => Arc::new(SheetCsvSource::new(url.clone())),
        None => {
            tracing::warn!("no sheetCsvUrl configured; keyword table stays empty until add_response");
            Arc::new(StaticSource::default())
        }
    };

    let cancel = CancellationToken::new();
    let scheduler = RefreshScheduler::new(
        responder.clone(),
        source,
        Duration::from_millis(config.refresh_interval_ms),
        cancel.child_token(),
    );
    let refresh_task = scheduler.spawn();

    let console = ConsoleChannel::new(responder);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown requested");
        }
        result = console.run(cancel.child_token()) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "console channel failed");
            }
        }
    }

    // Stop the refresh timer; in-flight sends are dropped best-effort.
    cancel.cancel();
    let _ = refresh_task.await;
    tracing::info!("remora stopped");
}
