//! Fully resolved node start request.
//!
//! The network tuning below is fixed per network and never collected from the
//! operator; the wizard only contributes the five configuration fields.

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ChainId, NodeMode};
use crate::config::NodeConfig;

/// Log verbosity handed to the node (`4` = debug).
pub const NODE_VERBOSITY: &str = "4";

const MIB: u64 = 1024 * 1024;

/// Swarm network the node joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }

    pub fn profile(&self) -> NetworkProfile {
        match self {
            Network::Mainnet => NetworkProfile::mainnet(),
            Network::Testnet => NetworkProfile::testnet(),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            other => Err(format!("unknown network: {other}")),
        }
    }
}

/// Network identity and storage tuning constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProfile {
    pub network: Network,
    pub network_id: u64,
    pub mainnet: bool,
    pub bootnodes: Vec<String>,
    /// Chain the payment endpoint must report; `None` skips the check.
    pub expected_chain_id: Option<ChainId>,
    pub full_node: bool,
    pub bootnode_mode: bool,
    pub swap_initial_deposit: String,
    pub payment_threshold: String,
    pub chequebook_enable: bool,
    pub use_postage_snapshot: bool,
    pub cache_capacity: u64,
    pub db_open_files_limit: u64,
    pub db_write_buffer_size: u64,
    pub db_block_cache_capacity: u64,
    pub db_disable_seeks_compaction: bool,
    pub retrieval_caching: bool,
}

impl NetworkProfile {
    pub fn mainnet() -> Self {
        Self {
            network: Network::Mainnet,
            network_id: 1,
            mainnet: true,
            bootnodes: vec!["/dnsaddr/mainnet.ethswarm.org".to_string()],
            expected_chain_id: Some(ChainId(100)),
            ..Self::base()
        }
    }

    pub fn testnet() -> Self {
        Self {
            network: Network::Testnet,
            network_id: 10,
            mainnet: false,
            bootnodes: vec!["/dnsaddr/testnet.ethswarm.org".to_string()],
            expected_chain_id: None,
            ..Self::base()
        }
    }

    fn base() -> Self {
        Self {
            network: Network::Mainnet,
            network_id: 1,
            mainnet: true,
            bootnodes: Vec::new(),
            expected_chain_id: None,
            full_node: false,
            bootnode_mode: false,
            swap_initial_deposit: "0".to_string(),
            payment_threshold: "100000000".to_string(),
            chequebook_enable: true,
            use_postage_snapshot: false,
            cache_capacity: 32 * MIB,
            db_open_files_limit: 50,
            db_write_buffer_size: 32 * MIB,
            db_block_cache_capacity: 32 * MIB,
            db_disable_seeks_compaction: false,
            retrieval_caching: true,
        }
    }
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self::mainnet()
    }
}

/// Everything the node service needs to start a node, except the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStartDescriptor {
    pub data_dir: PathBuf,
    pub welcome_message: String,
    pub nat_address: String,
    pub rpc_endpoint: String,
    pub swap_enable: bool,
    pub profile: NetworkProfile,
}

impl NodeStartDescriptor {
    /// Combines a finalized configuration record with the network defaults.
    pub fn resolve(config: &NodeConfig, profile: &NetworkProfile) -> Self {
        Self {
            data_dir: config.storage_path.clone(),
            welcome_message: config.welcome_message.clone(),
            nat_address: config.nat_address.clone(),
            rpc_endpoint: config.rpc_endpoint.clone(),
            swap_enable: config.payment_enabled,
            profile: profile.clone(),
        }
    }

    pub fn requested_mode(&self) -> NodeMode {
        NodeMode::from_payment_enabled(self.swap_enable)
    }
}
