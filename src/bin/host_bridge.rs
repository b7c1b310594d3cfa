//! Headless host bridge binary for stdin/stdout JSON communication.
//!
//! Usage: `cse-host [INSTALL_DIR]`. The install directory (default: the
//! current directory) holds `config/config.toml` and anchors relative TLS
//! file paths.
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel.

use anyhow::Context;
use cse_integration::config::IntegrationConfig;
use cse_integration::host::stdio::run_stdio_bridge;
use cse_integration::startup;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let install_dir = match std::env::args_os().nth(1) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };

    // Config is read before tracing starts so its log level can seed the
    // filter. RUST_LOG still wins when set.
    let config = IntegrationConfig::load(&install_dir)
        .with_context(|| format!("failed to load config from {}", install_dir.display()))?;

    let default_level = config.logging.level.as_filter();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    tracing::info!(install_dir = %install_dir.display(), "cse-host starting");

    let integration = startup(config, &install_dir).map_err(|e| {
        tracing::error!(error = %e, "cse-host startup failed");
        anyhow::anyhow!("cse-host startup failed: {e}")
    })?;

    run_stdio_bridge(integration).await.map_err(|e| {
        tracing::error!(error = %e, "cse-host exited with error");
        anyhow::anyhow!("cse-host failed: {e}")
    })?;

    tracing::info!("cse-host shut down cleanly");
    Ok(())
}
