//! Configuration loading and root folder resolution
//!
//! Settings come from a TOML file (`~/.config/menon/config.toml` by default).
//! A missing file is not an error: compiled defaults are used and a warning is
//! logged. Secrets and endpoints can be overridden by environment variables,
//! which take priority over the TOML file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::{Error, Result};

/// Environment variable overriding the root folder (highest after CLI)
pub const ENV_ROOT_FOLDER: &str = "MENON_ROOT_FOLDER";
/// Alternative, shorter root folder variable
pub const ENV_ROOT: &str = "MENON_ROOT";
/// Remote store base URL override
pub const ENV_STORE_URL: &str = "MENON_STORE_URL";
/// Remote store API key override
pub const ENV_STORE_KEY: &str = "MENON_STORE_KEY";
/// Webhook URL override
pub const ENV_WEBHOOK_URL: &str = "MENON_WEBHOOK_URL";

pub const DEFAULT_PRODUCTS_TABLE: &str = "productsmenon_duplicate";
pub const DEFAULT_OFFERS_TABLE: &str = "offers_menon";
pub const DEFAULT_BIND: &str = "127.0.0.1:5730";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Folder for local state (preferences)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// `[server]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// `[store]` section: remote record store endpoint and collection names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_products_table")]
    pub products_table: String,
    #[serde(default = "default_offers_table")]
    pub offers_table: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            products_table: default_products_table(),
            offers_table: default_offers_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[webhook]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint notified when a product is created; unset disables the call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_products_table() -> String {
    DEFAULT_PRODUCTS_TABLE.to_string()
}

fn default_offers_table() -> String {
    DEFAULT_OFFERS_TABLE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Resolved remote store endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCredentials {
    pub url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl StoreConfig {
    /// Resolve endpoint and key with ENV → TOML priority
    pub fn resolve_credentials(&self) -> Result<StoreCredentials> {
        let url = resolve_setting(ENV_STORE_URL, self.url.as_deref(), "store URL");
        let api_key = resolve_setting(ENV_STORE_KEY, self.api_key.as_deref(), "store API key");

        match (url, api_key) {
            (Some(url), Some(api_key)) => Ok(StoreCredentials {
                url,
                api_key,
                timeout: Duration::from_secs(self.timeout_secs),
            }),
            _ => Err(Error::Config(format!(
                "Remote store not configured. Please configure using one of:\n\
                 1. Environment: {}=https://<project>.supabase.co and {}=<anon key>\n\
                 2. TOML config: [store] url = \"...\" and api_key = \"...\"",
                ENV_STORE_URL, ENV_STORE_KEY
            ))),
        }
    }
}

impl WebhookConfig {
    /// Webhook URL with ENV → TOML priority; `None` when disabled
    pub fn resolve_url(&self) -> Option<String> {
        resolve_setting(ENV_WEBHOOK_URL, self.url.as_deref(), "webhook URL")
    }
}

fn resolve_setting(env_name: &str, toml_value: Option<&str>, label: &str) -> Option<String> {
    let env_value = std::env::var(env_name).ok().filter(|v| is_valid_value(v));
    let toml_value = toml_value.filter(|v| is_valid_value(v));

    if env_value.is_some() && toml_value.is_some() {
        warn!(
            "{} found in environment and TOML config. Using environment ({}).",
            label, env_name
        );
    }

    env_value.or_else(|| toml_value.map(str::to_string))
}

/// Validate a configured value (non-empty, non-whitespace)
pub fn is_valid_value(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Default configuration file path for the platform
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("menon").join("config.toml"))
}

/// Load TOML configuration
///
/// A missing file yields compiled defaults (with a warning) rather than an
/// error; a present but malformed file is an error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {} - using compiled defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write a TOML document atomically (temp file + rename)
///
/// Creates the parent directory when needed. On Unix the file is restricted
/// to mode 0600 since it may hold the store API key.
pub fn write_toml_config<T: Serialize>(config: &T, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize TOML failed: {}", e)))?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    std::fs::write(&tmp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Root folder resolution in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `MENON_ROOT_FOLDER`, then `MENON_ROOT`
/// 3. TOML `root_folder`
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    for name in [ENV_ROOT_FOLDER, ENV_ROOT] {
        if let Ok(path) = std::env::var(name) {
            if is_valid_value(&path) {
                return PathBuf::from(path);
            }
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("menon"))
        .unwrap_or_else(|| PathBuf::from("./menon_data"))
}

/// Create the root folder if it does not exist yet
pub fn ensure_directory_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        info!("Created root folder: {}", path.display());
    }
    Ok(())
}
