//! Sync agent: connects the connectivity signal to queue drains.
//!
//! State machine: Idle → Draining → Idle. Every offline→online transition is
//! a fresh full-queue attempt; there is no retrying-with-backoff state. The
//! drainer's in-flight guard makes overlapping triggers harmless.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::drain::Drainer;
use crate::remote::RemoteService;

/// Drains the submission queue whenever connectivity comes back.
pub struct SyncAgent<R> {
    drainer: Arc<Drainer<R>>,
    online: watch::Receiver<bool>,
}

impl<R: RemoteService> SyncAgent<R> {
    pub fn new(drainer: Arc<Drainer<R>>, online: watch::Receiver<bool>) -> Self {
        Self { drainer, online }
    }

    /// React to connectivity transitions until the shutdown token fires.
    pub async fn run(mut self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => break,

                changed = self.online.changed() => {
                    // Sender dropped means the monitor is gone; stop.
                    if changed.is_err() {
                        break;
                    }

                    let online = *self.online.borrow_and_update();
                    if online {
                        info!("Back online, draining queue");
                        self.drainer.drain(&shutdown).await;
                    } else {
                        info!("Offline, queueing submissions locally");
                    }
                }
            }
        }

        info!("Sync agent stopped");
    }
}
