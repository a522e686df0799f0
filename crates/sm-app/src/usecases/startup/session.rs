use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use sm_core::ports::RunningNodePort;
use sm_core::{IdentityAddress, NodeMode};

use crate::usecases::status_poller::{NodeStatusSnapshot, StatusPoller};

/// Owned handle to the running node plus its status refresh task.
///
/// There is at most one per process. Dropping the session stops the refresh
/// task but leaves the node running; call [`NodeSession::shutdown`] to stop it.
pub struct NodeSession {
    node: Arc<dyn RunningNodePort>,
    identity_address: IdentityAddress,
    mode: NodeMode,
    status: watch::Receiver<Option<NodeStatusSnapshot>>,
    cancel: CancellationToken,
    poller: Option<JoinHandle<()>>,
}

impl NodeSession {
    /// Takes ownership of a started node and begins refreshing its status.
    pub fn start(node: Arc<dyn RunningNodePort>, status_interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let (poller, status) =
            StatusPoller::new(node.clone(), status_interval).spawn(cancel.child_token());
        Self {
            identity_address: node.identity_address(),
            mode: node.effective_mode(),
            node,
            status,
            cancel,
            poller: Some(poller),
        }
    }

    pub fn identity_address(&self) -> &IdentityAddress {
        &self.identity_address
    }

    pub fn mode(&self) -> NodeMode {
        self.mode
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<NodeStatusSnapshot>> {
        self.status.clone()
    }

    /// Stops the refresh task and the node.
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        self.cancel.cancel();
        if let Some(poller) = self.poller.take() {
            if let Err(err) = poller.await {
                warn!(error = %err, "status poller ended abnormally");
            }
        }
        self.node.shutdown().await?;
        info!(address = %self.identity_address, "node session closed");
        Ok(())
    }
}

impl Drop for NodeSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl std::fmt::Debug for NodeSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeSession")
            .field("identity_address", &self.identity_address)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
