use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fmt, fs, time::Duration};
use url::Url;

use crate::domain::CommandOption;

// Runtime/client settings (not battle rules).

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_CONFIG_PATH: &str = "battle_client.toml";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_ENEMIES: [&str; 2] = ["Flyer", "Gutsco"];

pub const CONFIG_PATH_VAR: &str = "BATTLE_CLIENT_CONFIG";
pub const API_URL_VAR: &str = "BATTLE_API_URL";
pub const ENEMIES_VAR: &str = "BATTLE_ENEMIES";
pub const TIMEOUT_VAR: &str = "BATTLE_REQUEST_TIMEOUT_MS";

/// Settings resolved from defaults, then the TOML file, then the environment.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub enemy_names: Vec<String>,
    pub request_timeout: Duration,
    pub commands: Vec<CommandOption>,
}

// Optional keys of the TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_url: Option<String>,
    pub enemy_names: Option<Vec<String>>,
    pub request_timeout_ms: Option<u64>,
    pub commands: Option<Vec<CommandOption>>,
}

#[derive(Debug)]
pub enum ConfigError {
    ReadFile { path: PathBuf, source: std::io::Error },
    ParseFile { path: PathBuf, source: toml::de::Error },
    InvalidUrl { value: String, source: url::ParseError },
    InvalidNumber { key: &'static str, value: String },
    NoCommands,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ReadFile { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ConfigError::ParseFile { path, source } => {
                write!(f, "invalid config file {}: {source}", path.display())
            }
            ConfigError::InvalidUrl { value, source } => {
                write!(f, "invalid battle server url {value:?}: {source}")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a whole number, got {value:?}")
            }
            ConfigError::NoCommands => write!(f, "command menu must not be empty"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl ClientConfig {
    /// Reads the file named by `BATTLE_CLIENT_CONFIG` (or `battle_client.toml`
    /// when it exists) and applies process environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var(CONFIG_PATH_VAR) {
            Ok(path) => FileConfig::read(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                FileConfig::read(Path::new(DEFAULT_CONFIG_PATH))?
            }
            Err(_) => FileConfig::default(),
        };
        Self::resolve(file, |key| env::var(key).ok())
    }

    pub fn resolve(
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let raw_url = lookup(API_URL_VAR)
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&raw_url).map_err(|source| ConfigError::InvalidUrl {
            value: raw_url.clone(),
            source,
        })?;

        let enemy_names = match lookup(ENEMIES_VAR) {
            Some(value) => split_names(&value),
            None => file
                .enemy_names
                .unwrap_or_else(|| DEFAULT_ENEMIES.iter().map(|name| name.to_string()).collect()),
        };

        let request_timeout = match lookup(TIMEOUT_VAR) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidNumber {
                    key: TIMEOUT_VAR,
                    value,
                })?,
            None => file
                .request_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        };

        let commands = file
            .commands
            .unwrap_or_else(|| vec![CommandOption::fight()]);
        if commands.is_empty() {
            return Err(ConfigError::NoCommands);
        }

        Ok(Self {
            api_url,
            enemy_names,
            request_timeout,
            commands,
        })
    }
}

// "Flyer, Gutsco" -> ["Flyer", "Gutsco"]
fn split_names(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
