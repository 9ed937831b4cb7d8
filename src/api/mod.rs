//! Dashlink v1 wire types served to the dashboard frontend.

use serde::Serialize;

use crate::common::types::SessionId;
use crate::widgets::spotify::NowPlayingFeed;

/// Everything the frontend needs to render the now-playing badge.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlayingView {
    pub current_track_display: String,
    pub is_playing: bool,
    pub progress_formatted: String,
    pub duration_formatted: String,
    pub estimated_progress_ms: u64,
    pub duration_ms: u64,
    pub cover_image_url: String,
    pub track_external_url: String,
    pub artist_external_url: String,
    pub auto_refresh_enabled: bool,
    /// Tick counter; bumps once per second while the feed runs so clients
    /// can key re-renders off it.
    pub tick: u64,
}

impl NowPlayingView {
    pub fn from_feed(feed: &NowPlayingFeed) -> Self {
        let snapshot = feed.snapshot();
        let derived = feed.derived();

        Self {
            current_track_display: snapshot.display_title(),
            is_playing: snapshot.is_playing,
            progress_formatted: derived.formatted_position,
            duration_formatted: derived.formatted_duration,
            estimated_progress_ms: derived.estimated_progress_ms,
            duration_ms: snapshot.duration_ms,
            cover_image_url: snapshot.cover_url.clone(),
            track_external_url: snapshot.track_url.clone(),
            artist_external_url: snapshot.artist_url.clone(),
            auto_refresh_enabled: feed.is_running(),
            tick: feed.tick(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCreated {
    pub session_id: SessionId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    pub version: String,
    pub build_time: u64,
    pub git: GitInfo,
    pub widgets: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GitInfo {
    pub branch: String,
    pub commit: String,
}
