//! Configuration loader
//!
//! Loads client configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file from the working directory, if any
//! 2. Attempts to load from environment variables
//! 3. If incomplete, falls back to loading from file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `MERIDIAN_API_BASE_URL`: Entry point of the resource API
//! - `MERIDIAN_API_VENDOR`: Vendor token used in media types
//! - `MERIDIAN_OAUTH_AUTHORIZE_URL`: Authorization endpoint
//! - `MERIDIAN_OAUTH_TOKEN_URL`: Token endpoint
//! - `MERIDIAN_OAUTH_CLIENT_ID`: OAuth2 client identifier
//! - `MERIDIAN_OAUTH_CLIENT_SECRET`: OAuth2 client secret
//! - `MERIDIAN_OAUTH_REDIRECT_URI`: Registered redirect URI
//! - `MERIDIAN_OAUTH_SCOPE`: Requested scope (optional, defaults to `api`)
//! - `MERIDIAN_HTTP_TIMEOUT_SECS`: Request timeout in seconds (optional)
//! - `MERIDIAN_HTTP_USER_AGENT`: User agent (optional)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./meridian.json` or `./meridian.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. Relative to executable location

use std::path::{Path, PathBuf};

use meridian_domain::constants::DEFAULT_OAUTH_SCOPE;
use meridian_domain::{ApiConfig, Config, HttpSettings, MeridianError, OAuthSettings, Result};

use crate::errors::InfraError;

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables (after reading any
/// `.env` file). If any required variables are missing, falls back to
/// loading from a config file.
///
/// # Errors
/// Returns `MeridianError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Could not load .env file"),
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing.
///
/// # Errors
/// Returns `MeridianError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let api = ApiConfig {
        base_url: env_var("MERIDIAN_API_BASE_URL")?,
        vendor: env_var("MERIDIAN_API_VENDOR")?,
    };

    let oauth = OAuthSettings {
        authorize_url: env_var("MERIDIAN_OAUTH_AUTHORIZE_URL")?,
        token_url: env_var("MERIDIAN_OAUTH_TOKEN_URL")?,
        client_id: env_var("MERIDIAN_OAUTH_CLIENT_ID")?,
        client_secret: env_var("MERIDIAN_OAUTH_CLIENT_SECRET")?,
        redirect_uri: env_var("MERIDIAN_OAUTH_REDIRECT_URI")?,
        scope: std::env::var("MERIDIAN_OAUTH_SCOPE")
            .unwrap_or_else(|_| DEFAULT_OAUTH_SCOPE.to_string()),
    };

    let mut http = HttpSettings::default();
    if let Ok(timeout) = std::env::var("MERIDIAN_HTTP_TIMEOUT_SECS") {
        http.timeout_seconds = timeout
            .parse::<u64>()
            .map_err(|e| MeridianError::Config(format!("Invalid HTTP timeout: {e}")))?;
    }
    if let Ok(agent) = std::env::var("MERIDIAN_HTTP_USER_AGENT") {
        http.user_agent = agent;
    }

    Ok(Config { api, oauth, http })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `MeridianError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MeridianError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MeridianError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path).map_err(InfraError::from)?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => Ok(serde_json::from_str(contents).map_err(InfraError::from)?),
        _ => Err(MeridianError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
#[must_use]
pub fn probe_config_paths() -> Option<PathBuf> {
    const NAMES: [&str; 6] = [
        "config.json",
        "config.toml",
        "meridian.json",
        "meridian.toml",
        "../config.json",
        "../config.toml",
    ];

    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| NAMES.iter().map(move |name| root.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| MeridianError::Config(format!("Missing required environment variable: {key}")))
}
