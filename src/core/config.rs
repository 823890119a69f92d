//! Bot configuration
//!
//! Configuration is loaded once at startup into an immutable `BotConfig`
//! snapshot and shared via `Arc`. Nothing re-reads the file at runtime.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default path probed when no `--config` argument is given
pub const DEFAULT_CONFIG_PATH: &str = "config/relaybot.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Immutable configuration snapshot for the whole runtime
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotConfig {
    pub bot: BotSection,
    pub gateway: GatewaySection,
    pub server: ServerSection,
    pub plugins: PluginsSection,
    pub activity: ActivitySection,
}

/// Bot identity and command policy
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BotSection {
    pub name: String,
    /// The bot's own account id on the gateway, when known
    pub self_id: Option<i64>,
    /// Prefix that marks a message as a bot command
    pub command_prefix: String,
    /// User ids with elevated privileges (consumed by plugins, not the core)
    pub superusers: Vec<i64>,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            name: "relaybot".to_string(),
            self_id: None,
            command_prefix: "/".to_string(),
            superusers: Vec::new(),
        }
    }
}

/// Outbound action API endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewaySection {
    pub base_url: String,
    /// Bearer token sent with every action call, if non-empty
    pub token: String,
    pub timeout_secs: u64,
}

impl GatewaySection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5700".to_string(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Inbound event listener address
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Plugin load policy
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginsSection {
    /// Plugin ids skipped at startup
    pub disabled: Vec<String>,
}

/// Activity aggregation windows
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActivitySection {
    /// Days of activity buckets kept before the sweep evicts them
    pub retention_days: u32,
    pub sweep_interval_secs: u64,
}

impl ActivitySection {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for ActivitySection {
    fn default() -> Self {
        Self {
            retention_days: 7,
            sweep_interval_secs: 3600,
        }
    }
}

impl BotConfig {
    /// Load configuration from an explicit path, or probe the default
    /// location. An absent default file yields the built-in defaults; an
    /// explicitly named file must exist and parse.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    log::info!(
                        "no config file at {}, using built-in defaults",
                        DEFAULT_CONFIG_PATH
                    );
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        let display = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        let config: BotConfig = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: display.clone(),
            message: e.to_string(),
        })?;
        log::info!("configuration loaded from {}", display);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BotConfig::default();

        assert_eq!(config.bot.command_prefix, "/");
        assert_eq!(config.gateway.base_url, "http://127.0.0.1:5700");
        assert_eq!(config.gateway.timeout(), Duration::from_secs(10));
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.activity.retention_days, 7);
        assert!(config.plugins.disabled.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[bot]
name = "testbot"
self_id = 10001
command_prefix = "!"
superusers = [42]

[gateway]
base_url = "http://gateway:5700"
token = "secret"
timeout_secs = 3

[server]
host = "0.0.0.0"
port = 9000

[plugins]
disabled = ["echo"]

[activity]
retention_days = 3
sweep_interval_secs = 60
"#
        )
        .unwrap();

        let config = BotConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.bot.name, "testbot");
        assert_eq!(config.bot.self_id, Some(10001));
        assert_eq!(config.bot.command_prefix, "!");
        assert_eq!(config.bot.superusers, vec![42]);
        assert_eq!(config.gateway.token, "secret");
        assert_eq!(config.gateway.timeout(), Duration::from_secs(3));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.plugins.disabled, vec!["echo"]);
        assert_eq!(config.activity.retention_days, 3);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[server]\nport = 9999\n").unwrap();

        let config = BotConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.bot.command_prefix, "/");
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = BotConfig::load(Some(Path::new("/nonexistent/relaybot.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[bot\nname=").unwrap();

        let result = BotConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
