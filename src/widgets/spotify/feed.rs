//! Per-session now-playing state: one poll loop, one tick loop.
//!
//! The poll loop refreshes the track snapshot from Spotify on a fixed
//! cadence; the tick loop fires once per second so subscribers re-derive
//! the interpolated position between polls. The two loops are independent:
//! a failed poll iteration is logged and skipped, and neither loop can take
//! the other down.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::common::WidgetError;
use crate::widgets::spotify::now_playing::{TrackSnapshot, fetch_currently_playing};
use crate::widgets::spotify::progress::{self, DerivedProgress};
use crate::widgets::spotify::token::SpotifyTokenTracker;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

pub struct NowPlayingFeed {
    client: reqwest::Client,
    tokens: Arc<SpotifyTokenTracker>,
    update_interval: Duration,
    /// Current snapshot. Writers build the full new value and swap the Arc,
    /// so readers always observe a fully-written snapshot.
    snapshot: RwLock<Arc<TrackSnapshot>>,
    running: AtomicBool,
    fetching: AtomicBool,
    tick_seq: AtomicU64,
    tick_listeners: Mutex<Vec<flume::Sender<u64>>>,
    /// Serializes the scheduled poll against manual refreshes; two polls
    /// never run concurrently.
    poll_gate: tokio::sync::Mutex<()>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl NowPlayingFeed {
    pub fn new(
        client: reqwest::Client,
        tokens: Arc<SpotifyTokenTracker>,
        update_interval: Duration,
    ) -> Self {
        Self {
            client,
            tokens,
            update_interval,
            snapshot: RwLock::new(Arc::new(TrackSnapshot::default())),
            running: AtomicBool::new(false),
            fetching: AtomicBool::new(false),
            tick_seq: AtomicU64::new(0),
            tick_listeners: Mutex::new(Vec::new()),
            poll_gate: tokio::sync::Mutex::new(()),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn snapshot(&self) -> Arc<TrackSnapshot> {
        self.snapshot.read().clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching.load(Ordering::SeqCst)
    }

    pub fn tick(&self) -> u64 {
        self.tick_seq.load(Ordering::SeqCst)
    }

    /// Derives the interpolated position from the current snapshot.
    pub fn derived(&self) -> DerivedProgress {
        progress::estimate(&self.snapshot(), Instant::now())
    }

    /// Registers a tick subscriber. Disconnected receivers are pruned on the
    /// next tick.
    pub fn subscribe(&self) -> flume::Receiver<u64> {
        let (tx, rx) = flume::unbounded();
        self.tick_listeners.lock().push(tx);
        rx
    }

    /// Starts both loops. No-op while already running.
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        // Loops from an earlier run have observed the stop flag by now; any
        // still parked in their sleep must not wake into the new run.
        {
            let mut tasks = self.tasks.lock();
            for task in tasks.drain(..) {
                task.abort();
            }
        }

        let feed = Arc::clone(&self);
        let poll_task = tokio::spawn(async move { feed.poll_loop().await });

        let feed = Arc::clone(&self);
        let tick_task = tokio::spawn(async move { feed.tick_loop().await });

        let mut tasks = self.tasks.lock();
        tasks.push(poll_task);
        tasks.push(tick_task);
    }

    /// Signals both loops to wind down. An in-flight poll completes; the
    /// loops exit on their next wake, within one sleep interval.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Session teardown: stop and drop the task handles.
    pub fn shutdown(&self) {
        self.stop();
        let mut tasks = self.tasks.lock();
        for task in tasks.drain(..) {
            task.abort();
        }
    }

    /// Runs one poll outside the schedule, through the same gate.
    pub async fn force_refresh_now(&self) -> Result<(), WidgetError> {
        self.poll_once().await
    }

    async fn poll_loop(self: Arc<Self>) {
        debug!("Now-playing poll loop started ({:?} cadence)", self.update_interval);
        while self.running.load(Ordering::SeqCst) {
            if let Err(e) = self.poll_once().await {
                match e {
                    WidgetError::Transient(msg) => debug!("Skipping poll cycle: {}", msg),
                    other => warn!("Skipping poll cycle: {}", other),
                }
            }
            tokio::time::sleep(self.update_interval).await;
        }
        debug!("Now-playing poll loop stopped");
    }

    async fn tick_loop(self: Arc<Self>) {
        while self.running.load(Ordering::SeqCst) {
            let seq = self.tick_seq.fetch_add(1, Ordering::SeqCst) + 1;
            self.tick_listeners
                .lock()
                .retain(|listener| listener.send(seq).is_ok());
            tokio::time::sleep(TICK_INTERVAL).await;
        }
    }

    /// One poll cycle. Errors leave the previous snapshot in place.
    async fn poll_once(&self) -> Result<(), WidgetError> {
        let _gate = self.poll_gate.lock().await;
        self.fetching.store(true, Ordering::SeqCst);
        let result = self.poll_inner().await;
        self.fetching.store(false, Ordering::SeqCst);
        result
    }

    async fn poll_inner(&self) -> Result<(), WidgetError> {
        let credential = self.tokens.get_token().await?;

        match fetch_currently_playing(&self.client, &credential.access_token).await {
            Ok(snapshot) => {
                self.install(snapshot);
                Ok(())
            }
            Err(WidgetError::Auth(msg)) => {
                // Next cycle refreshes from the grant.
                self.tokens.invalidate().await;
                Err(WidgetError::Auth(msg))
            }
            Err(e) => Err(e),
        }
    }

    fn install(&self, mut snapshot: TrackSnapshot) {
        let mut current = self.snapshot.write();
        // The wall clock can step backwards; captured_at never does.
        if snapshot.captured_at < current.captured_at {
            snapshot.captured_at = current.captured_at;
        }
        *current = Arc::new(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::HttpClient;
    use crate::configs::SpotifyConfig;
    use crate::widgets::spotify::now_playing::NOT_PLAYING_TITLE;

    fn feed() -> Arc<NowPlayingFeed> {
        let client = HttpClient::new().unwrap();
        // No credentials configured: every poll cycle resolves to a Config
        // error without touching the network.
        let tokens = Arc::new(SpotifyTokenTracker::new(
            client.clone(),
            SpotifyConfig::default(),
        ));
        Arc::new(NowPlayingFeed::new(client, tokens, Duration::from_secs(20)))
    }

    #[tokio::test]
    async fn test_start_is_idempotent_and_stop_clears_running() {
        let feed = feed();
        assert!(!feed.is_running());

        feed.clone().start();
        assert!(feed.is_running());
        feed.clone().start();
        assert!(feed.is_running());
        assert_eq!(feed.tasks.lock().len(), 2);

        feed.stop();
        assert!(!feed.is_running());
        feed.shutdown();
        assert!(feed.tasks.lock().is_empty());
    }

    #[tokio::test]
    async fn test_tick_loop_publishes_to_subscribers() {
        let feed = feed();
        let rx = feed.subscribe();
        feed.clone().start();

        let seq = tokio::time::timeout(Duration::from_secs(3), rx.recv_async())
            .await
            .expect("tick within timeout")
            .expect("listener still connected");
        assert!(seq >= 1);
        assert!(feed.tick() >= seq);

        feed.shutdown();
    }

    #[tokio::test]
    async fn test_failed_poll_leaves_snapshot_in_place() {
        let feed = feed();
        feed.install(TrackSnapshot::not_playing(1_700_000_000.0, Instant::now()));

        let err = feed.poll_once().await.expect_err("no credentials configured");
        assert!(matches!(err, WidgetError::Config(_)));

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.track_title, NOT_PLAYING_TITLE);
        assert!(!feed.is_fetching());
    }

    #[tokio::test]
    async fn test_captured_at_never_walks_backwards() {
        let feed = feed();
        feed.install(TrackSnapshot::not_playing(1_700_000_100.0, Instant::now()));

        // Wall clock stepped back between polls.
        feed.install(TrackSnapshot::not_playing(1_700_000_050.0, Instant::now()));
        assert_eq!(feed.snapshot().captured_at, 1_700_000_100.0);

        feed.install(TrackSnapshot::not_playing(1_700_000_200.0, Instant::now()));
        assert_eq!(feed.snapshot().captured_at, 1_700_000_200.0);
    }

    #[tokio::test]
    async fn test_snapshot_replacement_is_wholesale() {
        let feed = feed();
        let before = feed.snapshot();
        assert_eq!(before.captured_at, 0.0);

        feed.install(TrackSnapshot::not_playing(1_700_000_000.0, Instant::now()));
        let after = feed.snapshot();
        assert_eq!(after.track_title, NOT_PLAYING_TITLE);
        // The previously handed-out Arc still reads the old value.
        assert_eq!(before.captured_at, 0.0);
    }
}
