//! Currently-playing fetch and snapshot normalization.

use std::time::Instant;

use serde_json::Value;

use crate::common::WidgetError;
use crate::server::now_unix;

const CURRENTLY_PLAYING_URL: &str = "https://api.spotify.com/v1/me/player/currently-playing";

/// Sentinel title for an HTTP 204 (nothing playing).
pub const NOT_PLAYING_TITLE: &str = "<not playing>";
/// Sentinel title for a 200 without a track item.
pub const NO_DATA_TITLE: &str = "<no data>";

/// The last known truth from Spotify at a point in time.
///
/// Immutable once created; each successful poll replaces the current
/// snapshot wholesale. `captured_at` is wall-clock (unix seconds, 0.0
/// before the first poll) and orders successive snapshots; `captured_mono`
/// anchors progress interpolation on the monotonic clock so system time
/// adjustments cannot skew the estimate.
#[derive(Debug, Clone, Default)]
pub struct TrackSnapshot {
    pub track_title: String,
    pub artist_names: Vec<String>,
    pub is_playing: bool,
    pub progress_ms: u64,
    pub duration_ms: u64,
    pub track_url: String,
    pub artist_url: String,
    pub cover_url: String,
    pub captured_at: f64,
    pub captured_mono: Option<Instant>,
}

impl TrackSnapshot {
    fn sentinel(title: &str, captured_at: f64, captured_mono: Instant) -> Self {
        Self {
            track_title: title.to_string(),
            captured_at,
            captured_mono: Some(captured_mono),
            ..Self::default()
        }
    }

    pub fn not_playing(captured_at: f64, captured_mono: Instant) -> Self {
        Self::sentinel(NOT_PLAYING_TITLE, captured_at, captured_mono)
    }

    pub fn no_data(captured_at: f64, captured_mono: Instant) -> Self {
        Self::sentinel(NO_DATA_TITLE, captured_at, captured_mono)
    }

    /// Builds a snapshot from a 200 payload. `None` when the payload has no
    /// track item (private session, podcast gap).
    pub fn from_payload(data: &Value, captured_at: f64, captured_mono: Instant) -> Option<Self> {
        let item = data.get("item")?;
        if item.is_null() {
            return None;
        }

        let track_title = item
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or_default()
            .to_string();

        let artists = item
            .get("artists")
            .and_then(|a| a.as_array())
            .cloned()
            .unwrap_or_default();

        let artist_names: Vec<String> = artists
            .iter()
            .filter_map(|a| a.get("name").and_then(|n| n.as_str()))
            .map(str::to_string)
            .collect();

        let artist_url = artists
            .first()
            .and_then(|a| a.pointer("/external_urls/spotify"))
            .and_then(|u| u.as_str())
            .unwrap_or_default()
            .to_string();

        // Album images are ordered largest first.
        let cover_url = item
            .pointer("/album/images/0/url")
            .and_then(|u| u.as_str())
            .unwrap_or_default()
            .to_string();

        Some(Self {
            track_title,
            artist_names,
            is_playing: data
                .get("is_playing")
                .and_then(|p| p.as_bool())
                .unwrap_or(false),
            progress_ms: data
                .get("progress_ms")
                .and_then(|p| p.as_u64())
                .unwrap_or(0),
            duration_ms: item
                .get("duration_ms")
                .and_then(|d| d.as_u64())
                .unwrap_or(0),
            track_url: item
                .pointer("/external_urls/spotify")
                .and_then(|u| u.as_str())
                .unwrap_or_default()
                .to_string(),
            artist_url,
            cover_url,
            captured_at,
            captured_mono: Some(captured_mono),
        })
    }

    /// `"Title – Artist, Artist"` (en-dash between title and artist list).
    pub fn display_title(&self) -> String {
        let artists = self.artist_names.join(", ");
        match (self.track_title.is_empty(), artists.is_empty()) {
            (false, false) => format!("{} – {}", self.track_title, artists),
            (false, true) => self.track_title.clone(),
            (true, false) => artists,
            (true, true) => "Unknown Track".to_string(),
        }
    }
}

/// One call against the currently-playing endpoint.
///
/// 204 and item-less 200 responses normalize into sentinel snapshots; a
/// 401 surfaces as `WidgetError::Auth` so the caller can drop its cached
/// credential; everything else non-2xx is transient.
pub async fn fetch_currently_playing(
    client: &reqwest::Client,
    access_token: &str,
) -> Result<TrackSnapshot, WidgetError> {
    let resp = client
        .get(CURRENTLY_PLAYING_URL)
        .bearer_auth(access_token)
        .send()
        .await?;

    let captured_at = now_unix();
    let captured_mono = Instant::now();

    let status = resp.status();
    if status == reqwest::StatusCode::NO_CONTENT {
        return Ok(TrackSnapshot::not_playing(captured_at, captured_mono));
    }
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(WidgetError::Auth(
            "currently-playing endpoint rejected the bearer token".to_string(),
        ));
    }
    if !status.is_success() {
        return Err(WidgetError::Transient(format!(
            "currently-playing endpoint returned {}",
            status
        )));
    }

    // A malformed body degrades to the "no data" sentinel; the loop keeps
    // polling either way.
    let data: Value = match resp.json().await {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!("Malformed currently-playing payload: {}", e);
            return Ok(TrackSnapshot::no_data(captured_at, captured_mono));
        }
    };

    Ok(
        TrackSnapshot::from_payload(&data, captured_at, captured_mono)
            .unwrap_or_else(|| TrackSnapshot::no_data(captured_at, captured_mono)),
    )
}
