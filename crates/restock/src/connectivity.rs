//! Connectivity monitoring.
//!
//! There is no ambient online/offline event source in a headless process, so
//! the monitor derives one: it probes the remote's health endpoint on a poll
//! interval and publishes the boolean over a watch channel. Subscribers see
//! transitions, not individual probes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use restock_core::emit;
use restock_core::metrics::events::ConnectivityChanged;

use crate::remote::RemoteService;

/// Probes the remote and publishes online/offline transitions.
///
/// The channel starts at `false` (offline); the first successful probe
/// publishes the initial offline→online transition, which also covers
/// replaying any backlog left over from a previous run.
pub struct ConnectivityMonitor<R> {
    remote: Arc<R>,
    poll_interval: Duration,
    sender: watch::Sender<bool>,
}

impl<R: RemoteService> ConnectivityMonitor<R> {
    pub fn new(remote: Arc<R>, poll_interval: Duration) -> (Self, watch::Receiver<bool>) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                remote,
                poll_interval,
                sender,
            },
            receiver,
        )
    }

    /// Run the probe loop until the shutdown token fires.
    pub async fn run(self, shutdown: CancellationToken) {
        loop {
            let online = match shutdown.run_until_cancelled(self.remote.health()).await {
                None => break,
                Some(result) => result.is_ok(),
            };

            let changed = self.sender.send_if_modified(|state| {
                if *state != online {
                    *state = online;
                    true
                } else {
                    false
                }
            });

            if changed {
                info!(online, "Connectivity changed");
                emit!(ConnectivityChanged { online });
            } else {
                debug!(online, "Connectivity unchanged");
            }

            if shutdown
                .run_until_cancelled(tokio::time::sleep(self.poll_interval))
                .await
                .is_none()
            {
                break;
            }
        }

        info!("Connectivity monitor stopped");
    }
}
