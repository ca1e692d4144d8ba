use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const ENV_BASE_URL: &str = "SWARM_CONSOLE_BASE_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "SWARM_CONSOLE_POLL_INTERVAL_MS";
pub const ENV_TIMEOUT_MS: &str = "SWARM_CONSOLE_TIMEOUT_MS";
pub const ENV_OFFLINE: &str = "SWARM_CONSOLE_OFFLINE";

pub const DEFAULT_CONFIG_FILE_NAME: &str = "swarm_console.toml";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:18789";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 4_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub request_timeout_ms: u64,
    pub offline: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            offline: false,
        }
    }
}

impl ConsoleConfig {
    pub fn from_default_sources() -> Result<Self, ConfigError> {
        let config_path = Path::new(DEFAULT_CONFIG_FILE_NAME);
        if config_path.exists() {
            return Self::from_config_file(config_path);
        }
        Self::from_env()
    }

    pub fn from_config_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|err| ConfigError::ReadConfigFile {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        let value: toml::Value =
            toml::from_str(&content).map_err(|err| ConfigError::ParseConfigFile {
                path: path.display().to_string(),
                message: err.to_string(),
            })?;
        let table = value
            .as_table()
            .ok_or_else(|| ConfigError::ParseConfigFile {
                path: path.display().to_string(),
                message: "root is not a TOML table".to_string(),
            })?;

        Self::from_env_with(|key| {
            table
                .get(key)
                .and_then(toml_value_to_string)
                .or_else(|| std::env::var(key).ok())
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_with<F>(mut getter: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let base_url = getter(ENV_BASE_URL)
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.base_url);
        let poll_interval_ms =
            parse_millis(&mut getter, ENV_POLL_INTERVAL_MS)?.unwrap_or(defaults.poll_interval_ms);
        let request_timeout_ms =
            parse_millis(&mut getter, ENV_TIMEOUT_MS)?.unwrap_or(defaults.request_timeout_ms);
        let offline = match getter(ENV_OFFLINE) {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                key: ENV_OFFLINE,
                value,
            })?,
            None => defaults.offline,
        };

        Ok(Self {
            base_url,
            poll_interval_ms,
            request_timeout_ms,
            offline,
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

fn parse_millis<F>(getter: &mut F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: FnMut(&str) -> Option<String>,
{
    let Some(value) = getter(key) else {
        return Ok(None);
    };
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn toml_value_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(value) => Some(value.clone()),
        toml::Value::Integer(value) => Some(value.to_string()),
        toml::Value::Float(value) => Some(value.to_string()),
        toml::Value::Boolean(value) => Some(value.to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
    ReadConfigFile { path: String, message: String },
    ParseConfigFile { path: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {key}: {value}")
            }
            ConfigError::ReadConfigFile { path, message } => {
                write!(f, "read config file failed ({path}): {message}")
            }
            ConfigError::ParseConfigFile { path, message } => {
                write!(f, "parse config file failed ({path}): {message}")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn getter(vars: &[(&str, &str)]) -> impl FnMut(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = ConsoleConfig::from_env_with(getter(&[])).expect("config");
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
    }

    #[test]
    fn env_overrides_are_applied() {
        let config = ConsoleConfig::from_env_with(getter(&[
            (ENV_BASE_URL, "http://swarm.local:9000/"),
            (ENV_POLL_INTERVAL_MS, "250"),
            (ENV_TIMEOUT_MS, "1500"),
            (ENV_OFFLINE, "yes"),
        ]))
        .expect("config");

        assert_eq!(config.base_url, "http://swarm.local:9000");
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.request_timeout_ms, 1500);
        assert!(config.offline);
    }

    #[test]
    fn invalid_interval_is_rejected() {
        let err = ConsoleConfig::from_env_with(getter(&[(ENV_POLL_INTERVAL_MS, "0")]))
            .expect_err("zero interval");
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_POLL_INTERVAL_MS,
                value: "0".to_string(),
            }
        );

        let err = ConsoleConfig::from_env_with(getter(&[(ENV_OFFLINE, "maybe")]))
            .expect_err("bad bool");
        assert!(err.to_string().contains(ENV_OFFLINE));
    }

    #[test]
    fn config_file_values_take_precedence() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("swarm-console-config-{unique}.toml"));
        fs::write(
            &path,
            "SWARM_CONSOLE_BASE_URL = \"http://file.local\"\nSWARM_CONSOLE_POLL_INTERVAL_MS = 1000\nSWARM_CONSOLE_OFFLINE = true\n",
        )
        .expect("write config");

        let config = ConsoleConfig::from_config_file(&path).expect("config");
        let _ = fs::remove_file(&path);

        assert_eq!(config.base_url, "http://file.local");
        assert_eq!(config.poll_interval_ms, 1000);
        assert!(config.offline);
    }

    #[test]
    fn malformed_config_file_reports_parse_error() {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("swarm-console-bad-{unique}.toml"));
        fs::write(&path, "this is = = not toml").expect("write config");

        let err = ConsoleConfig::from_config_file(&path).expect_err("parse error");
        let _ = fs::remove_file(&path);

        assert!(matches!(err, ConfigError::ParseConfigFile { .. }));
    }
}
