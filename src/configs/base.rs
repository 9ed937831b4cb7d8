use serde::{Deserialize, Serialize};

use crate::common::types::AnyResult;
use crate::configs::*;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub widgets: WidgetsConfig,
    #[serde(default)]
    pub spotify: Option<SpotifyConfig>,
    #[serde(default)]
    pub github: Option<GitHubConfig>,
    #[serde(default)]
    pub discord: Option<DiscordConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: None,
            widgets: WidgetsConfig::default(),
            spotify: None,
            github: None,
            discord: None,
        }
    }
}

impl Config {
    pub fn load() -> AnyResult<Self> {
        let config_path = if std::path::Path::new("config.toml").exists() {
            "config.toml"
        } else if std::path::Path::new("config.default.toml").exists() {
            "config.default.toml"
        } else {
            return Err("config.toml or config.default.toml not found".into());
        };

        let config_str = std::fs::read_to_string(config_path)?;
        if config_str.is_empty() {
            return Err(format!("{} is empty", config_path).into());
        }

        let config: Config = toml::from_str(&config_str)?;
        Ok(config.with_env_fallbacks())
    }

    /// Secrets may come from the environment instead of the config file.
    pub fn with_env_fallbacks(mut self) -> Self {
        if self.widgets.spotify {
            self.spotify = Some(self.spotify.unwrap_or_default().with_env_fallbacks());
        }
        if self.widgets.github {
            self.github = Some(self.github.unwrap_or_default().with_env_fallbacks());
        }
        if self.widgets.discord {
            self.discord = Some(self.discord.unwrap_or_default().with_env_fallbacks());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let config: Config = toml::from_str(
            r#"
                [server]
                host = "127.0.0.1"
                port = 5678
                password = "hunter2"

                [widgets]
                spotify = true
                github = false
                discord = false

                [spotify]
                clientId = "id"
                clientSecret = "secret"
                refreshToken = "refresh"
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.server.port, 5678);
        assert!(config.widgets.spotify);
        let spotify = config.spotify.expect("spotify table");
        assert_eq!(spotify.update_interval_secs, 20);
        assert_eq!(spotify.client_id.as_deref(), Some("id"));
    }

    #[test]
    fn test_empty_config_falls_back_to_defaults() {
        let config: Config = toml::from_str("").expect("empty config should parse");
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(!config.widgets.spotify);
        assert!(config.spotify.is_none());
    }
}
