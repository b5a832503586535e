//! Feed poller
//!
//! Owns the refresh cycle: a fixed interval timer plus on-demand refreshes,
//! never more than one acquisition cycle in flight. Each completed cycle
//! replaces the stored feed as a whole.

use quake_common::EarthquakeFeed;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::acquisition::AcquisitionChain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    Idle,
    Fetching,
}

/// Puts the poller back to `Idle` even if the cycle future is dropped.
struct FetchGuard<'a>(&'a Mutex<PollState>);

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.0.lock().unwrap_or_else(|e| e.into_inner());
        *state = PollState::Idle;
    }
}

pub struct FeedPoller {
    chain: AcquisitionChain,
    state: Mutex<PollState>,
    /// Most recent feed (None until the first cycle completes)
    feed: Arc<RwLock<Option<EarthquakeFeed>>>,
}

impl FeedPoller {
    pub fn new(chain: AcquisitionChain) -> Self {
        Self {
            chain,
            state: Mutex::new(PollState::Idle),
            feed: Arc::new(RwLock::new(None)),
        }
    }

    pub fn state(&self) -> PollState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub async fn latest(&self) -> Option<EarthquakeFeed> {
        self.feed.read().await.clone()
    }

    fn try_begin(&self) -> Option<FetchGuard<'_>> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state == PollState::Fetching {
            return None;
        }
        *state = PollState::Fetching;
        Some(FetchGuard(&self.state))
    }

    /// Run one acquisition cycle and store its feed.
    ///
    /// Returns `None` without doing anything if a cycle is already running.
    pub async fn refresh(&self) -> Option<EarthquakeFeed> {
        let Some(_guard) = self.try_begin() else {
            tracing::debug!("Refresh requested while a cycle is in flight, ignoring");
            return None;
        };

        let feed = self.chain.fetch_feed().await;
        *self.feed.write().await = Some(feed.clone());

        tracing::info!(
            "Feed updated: {} records from {} stage{}",
            feed.records.len(),
            feed.source,
            if feed.is_sample() { " (sample data)" } else { "" }
        );

        Some(feed)
    }

    /// Spawn the interval loop. The first cycle runs immediately.
    pub fn start(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tracing::info!("Scheduling feed refresh every {}s", interval.as_secs());

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if self.refresh().await.is_none() {
                    tracing::debug!("Skipped scheduled refresh, previous cycle still running");
                }
            }
        })
    }
}
