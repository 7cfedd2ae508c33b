use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `api.rest_api_key`.
pub const REST_API_KEY_ENV: &str = "RESELLERBOARD_REST_API_KEY";

fn default_base_url() -> String {
    "http://localhost:1337/parse".to_string()
}

fn default_session_file() -> PathBuf {
    PathBuf::from("session.json")
}

fn default_page_size() -> usize {
    10
}

/// Function backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server URL; functions are called at `{base_url}/functions/<name>`.
    pub base_url: String,

    /// Sent as `X-Parse-Application-Id`.
    pub application_id: String,

    /// Sent as `X-Parse-REST-API-Key`. Prefer the environment variable.
    pub rest_api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            application_id: String::new(),
            rest_api_key: None,
        }
    }
}

/// Report view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// Timezone used to turn sale timestamps into calendar days.
    ///
    /// "local" (default), "utc", or an IANA name such as "America/Sao_Paulo".
    pub timezone: Option<String>,

    /// Rows per page for a reseller's sales table on first render.
    pub page_size: usize,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            timezone: None,
            page_size: default_page_size(),
        }
    }
}

/// Display/output formatting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Prefix for rendered currency amounts.
    pub currency_symbol: String,

    /// Amounts are rendered with exactly this many decimal places.
    pub currency_decimals: u32,

    /// When true, render amounts with thousands separators.
    pub currency_grouping: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "R$".to_string(),
            currency_decimals: 2,
            currency_grouping: false,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,

    /// Where the session token is persisted. If relative, resolved from the
    /// config file location.
    pub session_file: Option<PathBuf>,

    pub reports: ReportsConfig,

    pub display: DisplayConfig,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the session file path against `config_dir`.
    pub fn resolve_session_file(&self, config_dir: &Path) -> PathBuf {
        let file = self
            .session_file
            .clone()
            .unwrap_or_else(default_session_file);
        if file.is_absolute() {
            file
        } else {
            config_dir.join(file)
        }
    }
}

/// Loaded configuration with resolved paths and secrets.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub application_id: String,
    pub rest_api_key: SecretString,
    pub session_file: PathBuf,
    pub reports: ReportsConfig,
    pub display: DisplayConfig,
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./resellerboard.toml` if it exists in current directory
/// 2. `~/.local/share/resellerboard/resellerboard.toml` (XDG data directory)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("resellerboard.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join("resellerboard").join("resellerboard.toml");
    }

    local_config
}

impl ResolvedConfig {
    fn resolve(config: Config, config_dir: &Path, env_key: Option<String>) -> Self {
        let session_file = config.resolve_session_file(config_dir);
        let rest_api_key = env_key
            .filter(|k| !k.trim().is_empty())
            .or(config.api.rest_api_key)
            .unwrap_or_default();

        Self {
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            application_id: config.api.application_id,
            rest_api_key: SecretString::from(rest_api_key),
            session_file,
            reports: config.reports,
            display: config.display,
        }
    }

    /// Load and resolve config from a file path.
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_path = config_path
            .canonicalize()
            .with_context(|| format!("Config file not found: {}", config_path.display()))?;

        let config_dir = config_path
            .parent()
            .context("Config file has no parent directory")?;

        let config = Config::load(&config_path)?;
        Ok(Self::resolve(
            config,
            config_dir,
            std::env::var(REST_API_KEY_ENV).ok(),
        ))
    }

    /// Load config, falling back to defaults if the file doesn't exist.
    ///
    /// Relative paths then resolve against the config file's intended
    /// parent directory.
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            return Self::load(config_path);
        }

        let config_path = if config_path.is_relative() {
            std::env::current_dir()
                .context("Failed to get current directory")?
                .join(config_path)
        } else {
            config_path.to_path_buf()
        };

        let config_dir = config_path
            .parent()
            .context("Config path has no parent directory")?;

        Ok(Self::resolve(
            Config::default(),
            config_dir,
            std::env::var(REST_API_KEY_ENV).ok(),
        ))
    }
}
