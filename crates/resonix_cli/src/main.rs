//! `resonix` server binary.
//!
//! # Responsibility
//! - Resolve flags and `RESONIX_*` environment fallbacks.
//! - Start file logging, open the data directory, and serve HTTP until Ctrl-C.

use anyhow::Context as _;
use clap::Parser;
use log::info;
use resonix_core::{default_log_level, init_logging, open_store, LogEcho, SiteConfig};
use resonix_http::{build_router, AppState};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "resonix", version, about = "Resonix Society site backend")]
struct Opts {
    /// Directory holding the topic JSON files
    #[arg(long, env = "RESONIX_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Address to listen on
    #[arg(long, env = "RESONIX_BIND", default_value = "127.0.0.1:5000")]
    bind: SocketAddr,

    /// Directory for rotating log files
    #[arg(long, env = "RESONIX_LOG_DIR", default_value = "logs")]
    log_dir: PathBuf,

    /// trace|debug|info|warn|error (defaults by build mode)
    #[arg(long, env = "RESONIX_LOG_LEVEL")]
    log_level: Option<String>,

    /// Optional JSON site config
    #[arg(long, env = "RESONIX_CONFIG")]
    config: Option<PathBuf>,

    /// Do not mirror log lines to stderr
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();

    let log_dir = absolute(&opts.log_dir)?;
    let level = opts
        .log_level
        .as_deref()
        .unwrap_or_else(|| default_log_level());
    let echo = if opts.quiet {
        LogEcho::Off
    } else {
        LogEcho::Stderr
    };
    init_logging(level, &log_dir.to_string_lossy(), echo)
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let config = match &opts.config {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SiteConfig::default(),
    };

    let data_dir = absolute(&opts.data_dir)?;
    let store = open_store(&data_dir)
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
    let app = build_router(AppState::new(Arc::new(store), config));

    let listener = tokio::net::TcpListener::bind(opts.bind)
        .await
        .with_context(|| format!("failed to bind {}", opts.bind))?;
    info!(
        "event=server_start module=cli status=ok bind={} data_dir={}",
        opts.bind,
        data_dir.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await
        .context("server failed")?;

    info!("event=server_stop module=cli status=ok");
    Ok(())
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    Ok(cwd.join(path))
}
