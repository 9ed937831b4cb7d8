use std::sync::Arc;

use crate::common::types::SessionId;
use crate::server::now_ms;
use crate::widgets::WidgetManager;
use crate::widgets::spotify::NowPlayingFeed;

/// A single client session.
///
/// Owns the session's now-playing feed (when the Spotify widget is
/// enabled); the feed's background tasks live exactly as long as the
/// session does.
pub struct Session {
    pub session_id: SessionId,
    pub now_playing: Option<Arc<NowPlayingFeed>>,
    pub created_at: u64,
}

impl Session {
    pub fn new(widgets: &WidgetManager) -> Self {
        Self {
            session_id: SessionId::generate(),
            now_playing: widgets.spotify.as_ref().map(|spotify| spotify.feed()),
            created_at: now_ms(),
        }
    }

    pub fn shutdown(&self) {
        tracing::info!("Shutting down session: {}", self.session_id);
        if let Some(feed) = &self.now_playing {
            feed.shutdown();
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(feed) = &self.now_playing {
            feed.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configs::Config;
    use crate::server::AppState;

    fn state_with_spotify() -> AppState {
        let mut config = Config::default();
        config.widgets.spotify = true;
        AppState::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let state = state_with_spotify();

        let session = state.create_session();
        assert_eq!(state.sessions.len(), 1);
        let feed = session.now_playing.clone().expect("spotify enabled");

        feed.clone().start();
        assert!(feed.is_running());

        let removed = state
            .remove_session(&session.session_id.clone())
            .expect("session existed");
        assert_eq!(state.sessions.len(), 0);
        assert!(!removed.now_playing.as_ref().unwrap().is_running());
    }

    #[tokio::test]
    async fn test_session_without_spotify_widget() {
        let state = AppState::new(Config::default()).unwrap();
        let session = state.create_session();
        assert!(session.now_playing.is_none());
        state.remove_session(&session.session_id.clone());
    }
}
