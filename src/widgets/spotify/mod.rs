pub mod feed;
pub mod now_playing;
pub mod progress;
pub mod token;

pub use feed::NowPlayingFeed;
pub use now_playing::TrackSnapshot;
pub use progress::DerivedProgress;
pub use token::{Credential, SpotifyTokenTracker};

use std::sync::Arc;
use std::time::Duration;

use crate::configs::SpotifyConfig;

/// App-level Spotify widget state; hands each session its own feed.
pub struct SpotifyWidget {
    client: reqwest::Client,
    config: SpotifyConfig,
    update_interval: Duration,
}

impl SpotifyWidget {
    pub fn new(client: reqwest::Client, config: SpotifyConfig) -> Self {
        if config.client_id.is_none()
            || config.client_secret.is_none()
            || config.refresh_token.is_none()
        {
            tracing::warn!(
                "Spotify widget enabled without full credentials; polling will be skipped"
            );
        }

        let update_interval = Duration::from_secs(config.update_interval_secs.max(1));

        Self {
            client,
            config,
            update_interval,
        }
    }

    /// Builds a session's feed. Each feed owns its credential cache and
    /// snapshot, so concurrent sessions stay isolated.
    pub fn feed(&self) -> Arc<NowPlayingFeed> {
        let tokens = Arc::new(SpotifyTokenTracker::new(
            self.client.clone(),
            self.config.clone(),
        ));
        Arc::new(NowPlayingFeed::new(
            self.client.clone(),
            tokens,
            self.update_interval,
        ))
    }
}
