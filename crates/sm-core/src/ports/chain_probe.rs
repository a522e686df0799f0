use async_trait::async_trait;

use crate::node::ChainId;
use crate::ports::errors::ProbeError;

/// Verifies that a URL is a live chain RPC endpoint.
#[async_trait]
pub trait ChainProbePort: Send + Sync {
    async fn probe(&self, endpoint: &str) -> Result<ChainId, ProbeError>;
}
