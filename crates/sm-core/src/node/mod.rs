//! Node identity, operating modes and the resolved start descriptor.

mod descriptor;
mod identity;

pub use descriptor::{Network, NetworkProfile, NodeStartDescriptor, NODE_VERBOSITY};
pub use identity::{ChainId, IdentityAddress};

use serde::{Deserialize, Serialize};

/// Operating mode of the storage node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeMode {
    /// Payment channel and chequebook enabled (Bee "light" node).
    Payment,
    /// No payment channel (Bee "ultra-light" node).
    #[default]
    Minimal,
}

impl NodeMode {
    /// Mode implied by the `paymentEnabled` flag of a configuration record.
    pub fn from_payment_enabled(payment_enabled: bool) -> Self {
        if payment_enabled {
            NodeMode::Payment
        } else {
            NodeMode::Minimal
        }
    }

    pub fn payment_enabled(self) -> bool {
        matches!(self, NodeMode::Payment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeMode::Payment => "payment",
            NodeMode::Minimal => "minimal",
        }
    }
}

impl std::fmt::Display for NodeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
