use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::common::{SharedRw, WidgetError};
use crate::configs::SpotifyConfig;
use crate::server::now_secs;

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Refresh this many seconds before the reported expiry to avoid racing it.
const EXPIRY_SAFETY_MARGIN_SECS: u64 = 60;

const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

#[derive(Clone, Debug)]
pub struct Credential {
    pub access_token: String,
    /// Unix seconds past which this credential must not be used.
    pub expires_at: u64,
}

impl Credential {
    pub fn from_grant(access_token: String, expires_in: u64, now: u64) -> Self {
        Self {
            access_token,
            expires_at: now + expires_in.saturating_sub(EXPIRY_SAFETY_MARGIN_SECS),
        }
    }

    pub fn is_valid(&self, now: u64) -> bool {
        now < self.expires_at
    }
}

/// Exchanges the configured long-lived refresh token for short-lived access
/// tokens, caching each one until near expiry.
pub struct SpotifyTokenTracker {
    client: reqwest::Client,
    config: SpotifyConfig,
    credential: SharedRw<Option<Credential>>,
}

impl SpotifyTokenTracker {
    pub fn new(client: reqwest::Client, config: SpotifyConfig) -> Self {
        Self {
            client,
            config,
            credential: Arc::new(RwLock::new(None)),
        }
    }

    /// Returns a currently-valid credential, refreshing if needed.
    pub async fn get_token(&self) -> Result<Credential, WidgetError> {
        let (client_id, client_secret, refresh_token) = self.configured_credentials()?;

        {
            let cached = self.credential.read().await;
            if let Some(credential) = &*cached {
                if credential.is_valid(now_secs()) {
                    return Ok(credential.clone());
                }
            }
        }

        self.refresh(client_id, client_secret, refresh_token).await
    }

    /// Drops the cached credential so the next call refreshes. Used when
    /// the data endpoint answers 401 despite an unexpired token.
    pub async fn invalidate(&self) {
        let mut credential = self.credential.write().await;
        if credential.take().is_some() {
            warn!("Discarding Spotify access token after upstream rejection");
        }
    }

    fn configured_credentials(&self) -> Result<(&str, &str, &str), WidgetError> {
        match (
            self.config.client_id.as_deref(),
            self.config.client_secret.as_deref(),
            self.config.refresh_token.as_deref(),
        ) {
            (Some(id), Some(secret), Some(refresh)) => Ok((id, secret, refresh)),
            _ => Err(WidgetError::Config(
                "Spotify client id, client secret and refresh token must be set".to_string(),
            )),
        }
    }

    async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<Credential, WidgetError> {
        debug!("Refreshing Spotify access token...");

        let resp = self
            .client
            .post(TOKEN_URL)
            .basic_auth(client_id, Some(client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await?;

        let status = resp.status();
        if status.is_client_error() {
            // invalid_grant, revoked refresh token, bad client secret
            return Err(WidgetError::Auth(format!(
                "token endpoint returned {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(WidgetError::Transient(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| WidgetError::Payload(e.to_string()))?;

        let access_token = body
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| {
                WidgetError::Payload("token response is missing access_token".to_string())
            })?;
        let expires_in = body
            .get("expires_in")
            .and_then(|e| e.as_u64())
            .unwrap_or(DEFAULT_EXPIRES_IN_SECS);

        let credential = Credential::from_grant(access_token.to_string(), expires_in, now_secs());

        let mut cached = self.credential.write().await;
        *cached = Some(credential.clone());

        debug!(
            "Spotify access token refreshed. Valid until {}",
            credential.expires_at
        );
        Ok(credential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::HttpClient;

    fn tracker(config: SpotifyConfig) -> SpotifyTokenTracker {
        SpotifyTokenTracker::new(HttpClient::new().unwrap(), config)
    }

    fn configured() -> SpotifyConfig {
        SpotifyConfig {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            refresh_token: Some("refresh".to_string()),
            ..SpotifyConfig::default()
        }
    }

    #[test]
    fn test_credential_window_arithmetic() {
        let credential = Credential::from_grant("tok".to_string(), 3600, 1_000_000);
        assert_eq!(credential.expires_at, 1_000_000 + 3600 - 60);
        assert!(credential.is_valid(1_000_000));
        assert!(credential.is_valid(1_000_000 + 3539));
        assert!(!credential.is_valid(1_000_000 + 3540));
    }

    #[test]
    fn test_credential_short_expiry_does_not_underflow() {
        let credential = Credential::from_grant("tok".to_string(), 30, 1_000_000);
        assert_eq!(credential.expires_at, 1_000_000);
        assert!(!credential.is_valid(1_000_000));
    }

    #[tokio::test]
    async fn test_missing_config_is_a_config_error() {
        let tracker = tracker(SpotifyConfig::default());
        match tracker.get_token().await {
            Err(WidgetError::Config(_)) => {}
            other => panic!("expected Config error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cached_credential_is_returned_without_refresh() {
        let tracker = tracker(configured());
        {
            let mut cached = tracker.credential.write().await;
            *cached = Some(Credential {
                access_token: "cached".to_string(),
                expires_at: now_secs() + 1800,
            });
        }

        // A refresh attempt would hit the network and fail in tests; the
        // cache hit path must return before that.
        let credential = tracker.get_token().await.expect("cache hit");
        assert_eq!(credential.access_token, "cached");
    }

    #[tokio::test]
    async fn test_invalidate_clears_the_cache() {
        let tracker = tracker(configured());
        {
            let mut cached = tracker.credential.write().await;
            *cached = Some(Credential {
                access_token: "cached".to_string(),
                expires_at: now_secs() + 1800,
            });
        }

        assert!(tracker.credential.read().await.is_some());
        tracker.invalidate().await;
        assert!(tracker.credential.read().await.is_none());
    }
}
