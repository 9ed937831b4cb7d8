use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SpotifyConfig {
    #[serde(rename = "clientId")]
    pub client_id: Option<String>,
    #[serde(rename = "clientSecret")]
    pub client_secret: Option<String>,
    #[serde(rename = "refreshToken")]
    pub refresh_token: Option<String>,
    /// Poll cadence for the currently-playing endpoint, in seconds.
    #[serde(default = "default_update_interval_secs", rename = "updateIntervalSecs")]
    pub update_interval_secs: u64,
}

fn default_update_interval_secs() -> u64 {
    20
}

impl Default for SpotifyConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            refresh_token: None,
            update_interval_secs: default_update_interval_secs(),
        }
    }
}

impl SpotifyConfig {
    /// Fills absent credentials from the environment.
    pub fn with_env_fallbacks(mut self) -> Self {
        if self.client_id.is_none() {
            self.client_id = std::env::var("SPOTIFY_CLIENT_ID").ok();
        }
        if self.client_secret.is_none() {
            self.client_secret = std::env::var("SPOTIFY_CLIENT_SECRET").ok();
        }
        if self.refresh_token.is_none() {
            self.refresh_token = std::env::var("SPOTIFY_REFRESH_TOKEN").ok();
        }
        self
    }
}
