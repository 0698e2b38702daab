//! Periodic keyword table refresh
//!
//! Fetches rows from the keyword source once at startup and then on a fixed
//! interval, installing each successful result as an atomic table swap.
//! A failed fetch keeps the previous table; it is never fatal.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::engine::Responder;
use crate::source::KeywordSource;

/// Drives the fetch-and-rebuild cycle for a [`Responder`].
pub struct RefreshScheduler {
    responder: Arc<Responder>,
    source: Arc<dyn KeywordSource>,
    interval: Duration,
    cancel: CancellationToken,
}

impl RefreshScheduler {
    /// Create a scheduler. `interval` must be non-zero; the config layer
    /// rejects a zero interval before construction.
    pub fn new(
        responder: Arc<Responder>,
        source: Arc<dyn KeywordSource>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            responder,
            source,
            interval,
            cancel,
        }
    }

    /// Spawn the refresh loop onto the runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately and covers the startup fetch.
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    tracing::debug!("refresh scheduler stopped");
                    return;
                }
                _ = ticker.tick() => self.refresh_once().await,
            }
        }
    }

    /// One fetch-and-install cycle. Rebuilds happen aside and publish as a
    /// single swap, so cancellation between cycles can never expose a
    /// half-built table.
    pub async fn refresh_once(&self) {
        match self.source.fetch_rows().await {
            Ok(rows) => {
                let fetched = rows.len();
                self.responder.install_rows(rows);
                tracing::info!(
                    rows = fetched,
                    entries = self.responder.table().len(),
                    "keyword table refreshed"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "keyword refresh failed, keeping previous table");
            }
        }
    }
}
