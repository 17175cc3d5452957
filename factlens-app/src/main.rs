use anyhow::Result;
use clap::Parser;
use factlens_common::{FactlensError, ShutdownHandle};
use factlens_common::observability::{LogConfig, LogFormat, init_logging};
use factlens_config::{FactlensConfig, FactlensConfigLoader};
use factlens_tui::{ClaimView, spawn_ui_feeders};
use factlens_verify::VerifyApi;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

const MAILBOX: usize = 256;

/// Terminal client for the fact-checking service.
#[derive(Parser, Debug)]
#[command(name = "factlens", version, about)]
struct Cli {
    /// Path to the configuration file. When omitted, `factlens.yaml` is used
    /// if it exists and defaults otherwise.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend origin, e.g. http://localhost:5000. Overrides config.
    #[arg(long, env = "FACTLENS_BACKEND")]
    backend: Option<String>,

    /// Log directory. Overrides config and `FACTLENS_LOG_DIR`.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log encoding: text or json. Overrides config.
    #[arg(long)]
    log_format: Option<String>,

    /// Mirror log events to stderr (corrupts the TUI; debugging only).
    #[arg(long)]
    stderr_log: bool,
}

fn load_config(cli: &Cli) -> Result<FactlensConfig> {
    let loader = match &cli.config {
        Some(path) => FactlensConfigLoader::new().with_file(path),
        None => FactlensConfigLoader::new().with_file_if_exists("factlens.yaml"),
    };
    loader
        .load()
        .map_err(|e| FactlensError::Config(e.to_string()).into())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli)?;

    let log_dir = cli
        .log_dir
        .clone()
        .or_else(|| cfg.logging.dir.as_deref().map(PathBuf::from));
    let format = cli
        .log_format
        .as_deref()
        .or(cfg.logging.format.as_deref())
        .map(LogFormat::from_name)
        .unwrap_or(LogFormat::Text);
    init_logging(LogConfig {
        log_dir,
        emit_stderr: cli.stderr_log || cfg.logging.stderr,
        format,
        ..LogConfig::default()
    })?;

    let base_url = cli.backend.clone().unwrap_or(cfg.backend.base_url);
    tracing::info!(backend = %base_url, "starting factlens");

    let api = VerifyApi::new(&base_url)
        .map_err(|e| FactlensError::Config(format!("invalid backend origin {base_url}: {e}")))?;

    let tick_rate = Duration::from_millis(cfg.ui.tick_ms);
    let shutdown = ShutdownHandle::new();

    let view = ClaimView::new(api, tick_rate, shutdown.clone())?;

    let (tx, rx) = mpsc::channel(MAILBOX);
    spawn_ui_feeders(tx.clone(), shutdown.clone(), tick_rate);

    view.run(rx, tx).await
}
