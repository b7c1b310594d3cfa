//! Static configuration for the integration.
//!
//! Loaded once from `config/config.toml` under the install directory. Every
//! section falls back to defaults, so a missing file or a partial file is
//! fine. Per-lookup options (API key, engine ID, result count) are not part
//! of this file; they arrive with each host command.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Location of the config file relative to the install directory.
pub const CONFIG_RELATIVE_PATH: &str = "config/config.toml";

/// Top-level integration configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Display name shown in the host's integration list.
    pub name: String,
    /// Short tag shown next to each result summary. Four characters or fewer.
    pub acronym: String,
    pub description: String,
    pub default_color: String,
    /// Only run lookups when the user explicitly asks.
    pub on_demand_only: bool,
    /// Entity types the host should send to this integration.
    pub entity_types: Vec<String>,
    /// Custom entity types recognised by the host on our behalf.
    pub custom_types: Vec<CustomType>,
    /// TLS and proxy defaults for the shared HTTP client.
    pub request: RequestConfig,
    pub logging: LoggingConfig,
    /// Admin-facing option definitions rendered by the host.
    pub options: Vec<OptionDefinition>,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            name: "Google Custom Search Engine (CSE)".into(),
            acronym: "GOOG".into(),
            description: "Google Search Custom Search (CSE) allows the user to retrieve and \
                          display search results from Google Custom Search programmatically."
                .into(),
            default_color: "light-gray".into(),
            on_demand_only: true,
            entity_types: [
                "IPv4", "IPv6", "MD5", "SHA1", "SHA256", "domain", "email", "url", "IPv4CIDR",
                "cve",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            custom_types: vec![CustomType {
                key: "search".into(),
                regex: r"\S[\s\S]{2,512}\S".into(),
            }],
            request: RequestConfig::default(),
            logging: LoggingConfig::default(),
            options: default_option_definitions(),
        }
    }
}

/// A host-recognised custom entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomType {
    pub key: String,
    pub regex: String,
}

/// TLS and proxy settings for the shared HTTP client.
///
/// Empty strings mean "not set". `cert`, `key` and `ca` are file paths;
/// relative paths resolve against the install directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Path to a PEM client certificate.
    pub cert: String,
    /// Path to the PEM private key for `cert`.
    pub key: String,
    /// Passphrase for `key`.
    pub passphrase: String,
    /// Path to a PEM bundle of extra trusted certificate authorities.
    pub ca: String,
    /// Proxy URL for all traffic. Basic auth may be embedded in the URL.
    pub proxy: String,
    /// Set to `false` to skip server certificate verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_unauthorized: Option<bool>,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

/// Log verbosity, using the host's level names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// The equivalent `tracing` filter directive. `fatal` maps to `error`.
    #[must_use]
    pub fn as_filter(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error | Self::Fatal => "error",
        }
    }
}

/// Input widget the host renders for an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Password,
    Text,
    Number,
}

/// One admin-facing option definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDefinition {
    pub key: String,
    pub name: String,
    pub description: String,
    pub default: serde_json::Value,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub user_can_edit: bool,
    pub admin_only: bool,
}

fn default_option_definitions() -> Vec<OptionDefinition> {
    vec![
        OptionDefinition {
            key: "apiKey".into(),
            name: "API Key".into(),
            description: "Valid Google CSE API Key".into(),
            default: serde_json::Value::String(String::new()),
            option_type: OptionType::Password,
            user_can_edit: false,
            admin_only: true,
        },
        OptionDefinition {
            key: "cx".into(),
            name: "Custom Search Engine ID".into(),
            description: "Google Custom Search Engine ID".into(),
            default: serde_json::Value::String(String::new()),
            option_type: OptionType::Text,
            user_can_edit: false,
            admin_only: true,
        },
        OptionDefinition {
            key: "maxResults".into(),
            name: "Maximum Number of Results to Return".into(),
            description: "Maximum number of search results to return".into(),
            default: serde_json::Value::from(5),
            option_type: OptionType::Number,
            user_can_edit: false,
            admin_only: true,
        },
    ]
}

impl IntegrationConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::IntegrationError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::IntegrationError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load `config/config.toml` from `install_dir`, or defaults if the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(install_dir: &Path) -> crate::error::Result<Self> {
        let path = Self::config_path(install_dir);
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// The config file path for `install_dir`.
    #[must_use]
    pub fn config_path(install_dir: &Path) -> PathBuf {
        install_dir.join(CONFIG_RELATIVE_PATH)
    }
}
