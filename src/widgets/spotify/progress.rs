//! Interpolated playback position between polls.
//!
//! The poller only lands every 20 s, so the UI-facing position is estimated
//! from the last snapshot plus the monotonic time elapsed since it was
//! captured. Estimation is abandoned past a staleness cutoff rather than
//! extrapolating a stalled poll forever.

use std::time::{Duration, Instant};

use super::now_playing::TrackSnapshot;

/// Past this, the poll presumably missed or stalled and the last exact
/// position is reported verbatim.
pub const STALENESS_CUTOFF: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedProgress {
    pub estimated_progress_ms: u64,
    pub formatted_position: String,
    pub formatted_duration: String,
}

/// Derives the displayable position from the latest snapshot at `now`.
pub fn estimate(snapshot: &TrackSnapshot, now: Instant) -> DerivedProgress {
    // A zero duration reads as "no track"; progress pins to zero.
    if snapshot.duration_ms == 0 {
        return DerivedProgress {
            estimated_progress_ms: 0,
            formatted_position: format_mmss(0),
            formatted_duration: format_mmss(0),
        };
    }

    let elapsed = snapshot
        .captured_mono
        .map(|anchor| now.saturating_duration_since(anchor));
    let estimated_progress_ms = estimate_ms(snapshot, elapsed);

    DerivedProgress {
        estimated_progress_ms,
        formatted_position: format_mmss(estimated_progress_ms),
        formatted_duration: format_mmss(snapshot.duration_ms),
    }
}

/// Core interpolation rule. `elapsed` is `None` before the first poll lands.
pub fn estimate_ms(snapshot: &TrackSnapshot, elapsed: Option<Duration>) -> u64 {
    let Some(elapsed) = elapsed else {
        return snapshot.progress_ms;
    };

    if !snapshot.is_playing || elapsed > STALENESS_CUTOFF {
        return snapshot.progress_ms;
    }

    let estimated = snapshot
        .progress_ms
        .saturating_add(elapsed.as_millis() as u64);

    if snapshot.duration_ms > 0 {
        estimated.min(snapshot.duration_ms)
    } else {
        estimated
    }
}

/// `M:SS` with unpadded minutes: `0` → `"0:00"`, `65000` → `"1:05"`.
pub fn format_mmss(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_snapshot(
        progress_ms: u64,
        duration_ms: u64,
        anchor: Option<Instant>,
    ) -> TrackSnapshot {
        TrackSnapshot {
            track_title: "Never Gonna Give You Up".to_string(),
            artist_names: vec!["Rick Astley".to_string()],
            is_playing: true,
            progress_ms,
            duration_ms,
            track_url: String::new(),
            artist_url: String::new(),
            cover_url: String::new(),
            captured_at: if anchor.is_some() { 1_700_000_000.0 } else { 0.0 },
            captured_mono: anchor,
        }
    }

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(0), "0:00");
        assert_eq!(format_mmss(65_000), "1:05");
        assert_eq!(format_mmss(600_000), "10:00");
        assert_eq!(format_mmss(999), "0:00");
        assert_eq!(format_mmss(59_999), "0:59");
    }

    #[test]
    fn test_estimate_adds_elapsed_while_playing() {
        let anchor = Instant::now();
        let snapshot = playing_snapshot(10_000, 200_000, Some(anchor));
        let derived = estimate(&snapshot, anchor + Duration::from_secs(5));
        assert_eq!(derived.estimated_progress_ms, 15_000);
        assert_eq!(derived.formatted_position, "0:15");
        assert_eq!(derived.formatted_duration, "3:20");
    }

    #[test]
    fn test_estimate_clamps_to_duration() {
        let anchor = Instant::now();
        let snapshot = playing_snapshot(195_000, 200_000, Some(anchor));
        let derived = estimate(&snapshot, anchor + Duration::from_secs(20));
        assert_eq!(derived.estimated_progress_ms, 200_000);
    }

    #[test]
    fn test_estimate_within_bounds_for_any_elapsed() {
        let anchor = Instant::now();
        let snapshot = playing_snapshot(42_000, 180_000, Some(anchor));
        for secs in [0u64, 1, 5, 29, 30] {
            let estimated = estimate_ms(&snapshot, Some(Duration::from_secs(secs)));
            assert!(estimated >= snapshot.progress_ms);
            assert!(estimated <= snapshot.duration_ms);
        }
    }

    #[test]
    fn test_staleness_guard_stops_extrapolation() {
        let anchor = Instant::now();
        let snapshot = playing_snapshot(10_000, 200_000, Some(anchor));
        let derived = estimate(&snapshot, anchor + Duration::from_secs(31));
        assert_eq!(derived.estimated_progress_ms, 10_000);
    }

    #[test]
    fn test_paused_snapshot_is_not_interpolated() {
        let anchor = Instant::now();
        let mut snapshot = playing_snapshot(10_000, 200_000, Some(anchor));
        snapshot.is_playing = false;
        let derived = estimate(&snapshot, anchor + Duration::from_secs(120));
        assert_eq!(derived.estimated_progress_ms, 10_000);
    }

    #[test]
    fn test_never_captured_returns_progress_verbatim() {
        let snapshot = playing_snapshot(10_000, 200_000, None);
        assert_eq!(estimate_ms(&snapshot, None), 10_000);
    }

    #[test]
    fn test_now_before_anchor_saturates_to_zero_elapsed() {
        let now = Instant::now();
        let anchor = now + Duration::from_secs(10);
        let snapshot = playing_snapshot(10_000, 200_000, Some(anchor));
        // Monotonic anchor in the future (cannot happen in practice) still
        // never walks the position backwards.
        let derived = estimate(&snapshot, now);
        assert_eq!(derived.estimated_progress_ms, 10_000);
    }

    #[test]
    fn test_zero_duration_always_formats_zero() {
        let anchor = Instant::now();
        let snapshot = playing_snapshot(15_000, 0, Some(anchor));
        let derived = estimate(&snapshot, anchor + Duration::from_secs(5));
        assert_eq!(derived.estimated_progress_ms, 0);
        assert_eq!(derived.formatted_position, "0:00");
        assert_eq!(derived.formatted_duration, "0:00");
    }
}
