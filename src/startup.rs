//! One-time integration startup: load TLS material, build the shared client.
//!
//! Path-valued request settings are read synchronously from disk. Any read
//! failure aborts startup; the integration never runs half-configured.

use crate::config::{IntegrationConfig, RequestConfig};
use crate::error::{IntegrationError, Result};
use crate::integration::Integration;
use cse_search::{ClientSettings, CseSearcher, HttpTransport};
use std::path::{Path, PathBuf};

/// Start the integration from its static config.
///
/// Relative `cert`, `key` and `ca` paths resolve against `install_dir`.
///
/// # Errors
///
/// Returns [`IntegrationError::Startup`] if a configured file cannot be
/// read, and [`IntegrationError::Search`] if the client cannot be built
/// from the loaded material.
pub fn startup(
    config: IntegrationConfig,
    install_dir: &Path,
) -> Result<Integration<HttpTransport>> {
    let settings = load_client_settings(&config.request, install_dir)?;
    tracing::info!(
        identity = settings.has_identity(),
        custom_ca = settings.ca.is_some(),
        proxy = settings.proxy.is_some(),
        reject_unauthorized = ?settings.reject_unauthorized,
        "building search client"
    );

    let searcher = CseSearcher::from_settings(&settings)?;
    tracing::info!(name = %config.name, "integration started");
    Ok(Integration::new(searcher, config))
}

/// Resolve the `request` section into client settings, reading any
/// configured files.
///
/// Empty strings are treated as unset.
///
/// # Errors
///
/// Returns [`IntegrationError::Startup`] if a configured file cannot be read.
pub fn load_client_settings(request: &RequestConfig, install_dir: &Path) -> Result<ClientSettings> {
    Ok(ClientSettings {
        cert: read_optional("cert", &request.cert, install_dir)?,
        key: read_optional("key", &request.key, install_dir)?,
        passphrase: non_empty(&request.passphrase),
        ca: read_optional("ca", &request.ca, install_dir)?,
        proxy: non_empty(&request.proxy),
        reject_unauthorized: request.reject_unauthorized,
    })
}

/// Resolve `path` against `install_dir` unless it is already absolute.
#[must_use]
pub fn resolve_path(path: &str, install_dir: &Path) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        install_dir.join(path)
    }
}

fn read_optional(field: &str, path: &str, install_dir: &Path) -> Result<Option<Vec<u8>>> {
    if path.is_empty() {
        return Ok(None);
    }
    let resolved = resolve_path(path, install_dir);
    let bytes = std::fs::read(&resolved).map_err(|e| {
        IntegrationError::Startup(format!(
            "failed to read {field} file {}: {e}",
            resolved.display()
        ))
    })?;
    tracing::debug!(field, path = %resolved.display(), "loaded TLS material");
    Ok(Some(bytes))
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
