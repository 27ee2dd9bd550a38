//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.rentdesk/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::Provider;
use crate::inference::providers::{DEFAULT_GEMINI_BASE_URL, DEFAULT_OPENROUTER_BASE_URL};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RentDeskConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub gemini: ProviderConfig,
    #[serde(default)]
    pub openrouter: ProviderConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub business_name: Option<String>,
    pub default_provider: Option<Provider>,
    pub default_model: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub seed_sample_data: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BUSINESS_NAME: &str = "Soleh Rent";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENROUTER_MODEL: &str = "google/gemini-2.5-flash";

/// Model used when nothing names one explicitly.
pub fn default_model(provider: Provider) -> &'static str {
    match provider {
        Provider::Gemini => DEFAULT_GEMINI_MODEL,
        Provider::OpenRouter => DEFAULT_OPENROUTER_MODEL,
    }
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub business_name: String,
    pub provider: Provider,
    pub model_name: String,
    pub request_timeout: Duration,
    pub seed_sample_data: bool,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
}

impl ResolvedConfig {
    /// The key for whichever provider was selected.
    pub fn api_key(&self) -> Option<&str> {
        match self.provider {
            Provider::Gemini => self.gemini_api_key.as_deref(),
            Provider::OpenRouter => self.openrouter_api_key.as_deref(),
        }
    }
}

/// Settings that come from command-line flags. `None`/`false` = not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub empty: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.rentdesk/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".rentdesk").join("config.toml"))
}

/// Load config from `~/.rentdesk/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `RentDeskConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<RentDeskConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(RentDeskConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(RentDeskConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<RentDeskConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: RentDeskConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // Keys are redacted; the rest is safe to log.
    debug!(
        "Config: general={:?}, gemini.base_url={:?}, openrouter.base_url={:?}",
        config.general, config.gemini.base_url, config.openrouter.base_url
    );
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# RentDesk Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# business_name = "Soleh Rent"
# default_provider = "gemini"        # "gemini" or "openrouter"
# default_model = "gemini-2.5-flash"
# request_timeout_secs = 60
# seed_sample_data = true            # --empty turns this off for one run

# [gemini]
# api_key = "AIza..."                # Or set GEMINI_API_KEY (or API_KEY)
# base_url = "https://generativelanguage.googleapis.com/v1beta"

# [openrouter]
# api_key = "sk-or-..."              # Or set OPENROUTER_API_KEY
# base_url = "https://openrouter.ai/api/v1"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve against the process environment.
pub fn resolve(config: &RentDeskConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_from(config, cli, |key| std::env::var(key).ok())
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `env` looks up one environment variable; empty values count as unset.
pub fn resolve_from(
    config: &RentDeskConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let env = |key: &str| env(key).filter(|value| !value.trim().is_empty());

    // Provider: CLI → env → config → default
    let provider = cli
        .provider
        .or_else(|| env("RENTDESK_PROVIDER").and_then(|raw| parse_provider(&raw)))
        .or(config.general.default_provider)
        .unwrap_or_default();

    // Model: CLI → env → config → per-provider default
    let model_name = cli
        .model
        .clone()
        .or_else(|| env("RENTDESK_MODEL"))
        .or_else(|| config.general.default_model.clone())
        .unwrap_or_else(|| default_model(provider).to_string());

    // Gemini key: GEMINI_API_KEY → API_KEY → config
    let gemini_api_key = env("GEMINI_API_KEY")
        .or_else(|| env("API_KEY"))
        .or_else(|| config.gemini.api_key.clone());

    let gemini_base_url = env("GEMINI_BASE_URL")
        .or_else(|| config.gemini.base_url.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string());

    let openrouter_api_key = env("OPENROUTER_API_KEY").or_else(|| config.openrouter.api_key.clone());

    let openrouter_base_url = env("OPENROUTER_BASE_URL")
        .or_else(|| config.openrouter.base_url.clone())
        .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string());

    let seed_sample_data = !cli.empty && config.general.seed_sample_data.unwrap_or(true);

    ResolvedConfig {
        business_name: config
            .general
            .business_name
            .clone()
            .unwrap_or_else(|| DEFAULT_BUSINESS_NAME.to_string()),
        provider,
        model_name,
        request_timeout: Duration::from_secs(
            config
                .general
                .request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        ),
        seed_sample_data,
        gemini_api_key,
        gemini_base_url,
        openrouter_api_key,
        openrouter_base_url,
    }
}

fn parse_provider(raw: &str) -> Option<Provider> {
    match Provider::from_str(raw.trim(), true) {
        Ok(provider) => Some(provider),
        Err(_) => {
            warn!("Ignoring unknown RENTDESK_PROVIDER value: {raw}");
            None
        }
    }
}
