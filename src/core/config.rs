//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.stampnav/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StampnavConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub fixture: FixtureConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_provider: Option<String>,
    /// Composite code to open at start-up.
    pub start_code: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HttpConfig {
    pub base_url: Option<String>,
    pub api_token: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FixtureConfig {
    pub path: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PROVIDER: &str = "fixture";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = crate::catalogue::providers::http::DEFAULT_TIMEOUT_SECS;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: String,
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    /// `None` means the built-in sample catalogue.
    pub fixture_path: Option<PathBuf>,
    pub start_code: Option<String>,
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub provider: Option<String>,
    pub fixture_path: Option<PathBuf>,
    pub start_code: Option<String>,
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

/// Returns `~/.stampnav`.
pub fn app_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".stampnav"))
}

/// Returns the path to `~/.stampnav/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    app_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.stampnav/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `StampnavConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<StampnavConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(StampnavConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(StampnavConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<StampnavConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: StampnavConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# stampnav configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_provider = "fixture"       # "fixture" or "http"
# start_code = "NZ.014"              # path to open at start-up

# [http]
# base_url = "http://localhost:8080/api"   # Or set STAMPNAV_API_URL
# api_token = "..."                        # Or set STAMPNAV_API_TOKEN
# timeout_secs = 15

# [fixture]
# path = "catalogue.json"            # Or set STAMPNAV_FIXTURE; built-in sample if unset
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &StampnavConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &StampnavConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Provider: CLI → env → config → default
    let provider = cli
        .provider
        .clone()
        .or_else(|| env("STAMPNAV_PROVIDER"))
        .or_else(|| config.general.default_provider.clone())
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

    // API base URL: env → config → default
    let api_base_url = env("STAMPNAV_API_URL")
        .or_else(|| config.http.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    // API token: env → config
    let api_token = env("STAMPNAV_API_TOKEN").or_else(|| config.http.api_token.clone());

    // Fixture path: CLI → env → config (relative paths resolve under ~/.stampnav/)
    let fixture_path = cli.fixture_path.clone().or_else(|| {
        env("STAMPNAV_FIXTURE")
            .map(PathBuf::from)
            .or_else(|| config.fixture.path.as_deref().map(resolve_app_relative))
    });

    let start_code = cli
        .start_code
        .clone()
        .or_else(|| config.general.start_code.clone());

    ResolvedConfig {
        provider,
        api_base_url,
        api_token,
        timeout_secs: config.http.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        fixture_path,
        start_code,
    }
}

fn resolve_app_relative(path: &str) -> PathBuf {
    let path = PathBuf::from(path);
    if path.is_absolute() {
        return path;
    }
    match app_dir() {
        Some(dir) => dir.join(path),
        None => path,
    }
}
