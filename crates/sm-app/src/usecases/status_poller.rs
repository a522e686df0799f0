//! Periodic status refresh for a running node.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info_span, warn, Instrument};

use sm_core::ports::RunningNodePort;
use sm_core::NodeMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeStatusSnapshot {
    pub connected_peers: usize,
    /// Only populated for payment nodes.
    pub chequebook_balance: Option<String>,
    pub refreshed_at: DateTime<Utc>,
}

pub struct StatusPoller {
    node: Arc<dyn RunningNodePort>,
    interval: Duration,
}

impl StatusPoller {
    pub fn new(node: Arc<dyn RunningNodePort>, interval: Duration) -> Self {
        Self { node, interval }
    }

    /// Query the node once. Only a failed peer count fails the refresh; a
    /// failed balance query leaves the balance empty.
    pub async fn refresh_once(&self) -> anyhow::Result<NodeStatusSnapshot> {
        let connected_peers = self.node.connected_peers().await?;
        let chequebook_balance = match self.node.effective_mode() {
            NodeMode::Payment => match self.node.chequebook_balance().await {
                Ok(balance) => Some(balance),
                Err(err) => {
                    warn!(error = %err, "chequebook balance refresh failed");
                    None
                }
            },
            NodeMode::Minimal => None,
        };
        Ok(NodeStatusSnapshot {
            connected_peers,
            chequebook_balance,
            refreshed_at: Utc::now(),
        })
    }

    /// Run until `cancel` fires. Refresh errors are logged and the loop goes on.
    pub fn spawn(
        self,
        cancel: CancellationToken,
    ) -> (JoinHandle<()>, watch::Receiver<Option<NodeStatusSnapshot>>) {
        let (tx, rx) = watch::channel(None);
        let span = info_span!(
            "usecase.status_poller.run",
            interval_ms = self.interval.as_millis() as u64
        );

        let handle = tokio::spawn(
            async move {
                let mut ticker = tokio::time::interval(self.interval);
                ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
                loop {
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            debug!("status poller cancelled");
                            break;
                        }
                        _ = ticker.tick() => {
                            match self.refresh_once().await {
                                Ok(snapshot) => {
                                    debug!(
                                        peers = snapshot.connected_peers,
                                        "node status refreshed"
                                    );
                                    if tx.send(Some(snapshot)).is_err() {
                                        debug!("no status subscribers left");
                                    }
                                }
                                Err(err) => warn!(error = %err, "node status refresh failed"),
                            }
                        }
                    }
                }
            }
            .instrument(span),
        );

        (handle, rx)
    }
}
