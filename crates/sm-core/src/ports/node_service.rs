use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::node::{IdentityAddress, NodeMode, NodeStartDescriptor};
use crate::security::SecretString;

/// Starts storage nodes.
#[async_trait]
pub trait NodeServicePort: Send + Sync {
    /// Start a node. Blocks until the node is usable or has failed.
    async fn start_node(
        &self,
        descriptor: &NodeStartDescriptor,
        password: &SecretString,
    ) -> anyhow::Result<Arc<dyn RunningNodePort>>;

    /// Derive the node identity address from the data on disk without starting it.
    async fn recover_identity_address(
        &self,
        storage_path: &Path,
        password: &SecretString,
    ) -> anyhow::Result<IdentityAddress>;
}

/// Handle to a started node.
#[async_trait]
pub trait RunningNodePort: Send + Sync {
    fn effective_mode(&self) -> NodeMode;

    fn identity_address(&self) -> IdentityAddress;

    async fn connected_peers(&self) -> anyhow::Result<usize>;

    /// Available chequebook balance in PLUR, as a decimal string.
    async fn chequebook_balance(&self) -> anyhow::Result<String>;

    /// Stop the node. Idempotent.
    async fn shutdown(&self) -> anyhow::Result<()>;
}
