use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::ResultLimit;
use crate::session::SessionSettings;
use crate::snapshot::SnapshotReader;

const APP_DIR_NAME: &str = "BrowserSearch";
const CONFIG_FILE_NAME: &str = "config.json";
const LEGACY_CONFIG_FILE_NAME: &str = "config.toml";
pub const DEFAULT_MAX_RESULTS: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Browser identifier as reported by the host, e.g. "Google Chrome".
    pub browser: Option<String>,
    pub profile: Option<String>,
    /// `-1` shows every match.
    pub max_results: i64,
    pub scratch_dir: PathBuf,
    pub log_level: String,
    #[serde(skip)]
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: None,
            profile: None,
            max_results: DEFAULT_MAX_RESULTS,
            scratch_dir: std::env::temp_dir(),
            log_level: "info".to_string(),
            config_path: default_config_path(),
        }
    }
}

impl Config {
    pub fn result_limit(&self) -> ResultLimit {
        ResultLimit::from_setting(self.max_results).unwrap_or(ResultLimit::Max(DEFAULT_MAX_RESULTS as usize))
    }

    pub fn log_level_filter(&self) -> Option<log::LevelFilter> {
        log::LevelFilter::from_str(self.log_level.trim()).ok()
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            profile: self.profile.clone().filter(|p| !p.trim().is_empty()),
            max_results: self.result_limit(),
            snapshots: SnapshotReader::new(self.scratch_dir.clone()),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse { path: PathBuf, message: String },
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(error) => write!(f, "io error: {error}"),
            Self::Parse { path, message } => {
                write!(f, "failed to parse {}: {message}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// `%APPDATA%\BrowserSearch`, or a temp-dir fallback when `APPDATA` is unset.
pub fn stable_app_data_dir() -> PathBuf {
    match std::env::var_os("APPDATA") {
        Some(appdata) if !appdata.is_empty() => PathBuf::from(appdata).join(APP_DIR_NAME),
        _ => std::env::temp_dir().join(APP_DIR_NAME.to_ascii_lowercase()),
    }
}

pub fn default_config_path() -> PathBuf {
    stable_app_data_dir().join(CONFIG_FILE_NAME)
}

/// Reads `path` (default location when `None`). A missing JSON file falls
/// back to a legacy `config.toml` beside it, then to defaults.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    let mut cfg = if config_path.exists() {
        parse_file(&config_path)?
    } else {
        let legacy = config_path.with_file_name(LEGACY_CONFIG_FILE_NAME);
        if is_toml(&config_path) || !legacy.exists() {
            Config::default()
        } else {
            log::info!("reading legacy config {}", legacy.display());
            parse_file(&legacy)?
        }
    };
    cfg.config_path = config_path;

    validate(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

pub fn save(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = cfg.config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let encoded = if is_toml(&cfg.config_path) {
        toml::to_string_pretty(cfg).map_err(|e| ConfigError::Invalid(e.to_string()))?
    } else {
        serde_json::to_string_pretty(cfg).map_err(|e| ConfigError::Invalid(e.to_string()))?
    };
    std::fs::write(&cfg.config_path, encoded)?;
    Ok(())
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.max_results < ResultLimit::UNLIMITED_SENTINEL {
        return Err("max_results must be -1 (unlimited) or a non-negative count".into());
    }

    if cfg.scratch_dir.as_os_str().is_empty() {
        return Err("scratch_dir is required".into());
    }

    if cfg.log_level_filter().is_none() {
        return Err(format!("unknown log_level '{}'", cfg.log_level));
    }

    if cfg
        .browser
        .as_deref()
        .is_some_and(|browser| browser.trim().is_empty())
    {
        return Err("browser must not be blank".into());
    }

    Ok(())
}

fn parse_file(path: &Path) -> Result<Config, ConfigError> {
    let raw = std::fs::read_to_string(path)?;
    let parsed = if is_toml(path) {
        toml::from_str::<Config>(&raw).map_err(|e| e.to_string())
    } else {
        json5::from_str::<Config>(&raw).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}
