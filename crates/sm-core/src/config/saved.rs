use std::path::PathBuf;

use super::NodeConfig;
use crate::security::SecretString;

/// Settings store keys. Spelling is part of the persisted format.
pub mod keys {
    pub const PASSWORD: &str = "password";
    pub const WELCOME_MESSAGE: &str = "welcomeMessage";
    pub const PAYMENT_ENABLED: &str = "paymentEnabled";
    pub const NAT_ADDRESS: &str = "natAddress";
    pub const RPC_ENDPOINT: &str = "rpcEndpoint";

    pub const ALL: [&str; 5] = [
        PASSWORD,
        WELCOME_MESSAGE,
        PAYMENT_ENABLED,
        NAT_ADDRESS,
        RPC_ENDPOINT,
    ];
}

/// The configuration as it lives in the settings store.
///
/// Absent keys read as `""` / `false`, so a fresh store yields
/// `SavedConfig::default()`.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SavedConfig {
    pub password: SecretString,
    pub welcome_message: String,
    pub payment_enabled: bool,
    pub nat_address: String,
    pub rpc_endpoint: String,
}

impl SavedConfig {
    /// Eligible for a silent resume.
    ///
    /// A blank NAT address is a legal wizard outcome but is not resumable; such
    /// configurations go back through the wizard on the next launch.
    pub fn is_complete(&self) -> bool {
        !self.password.is_empty()
            && !self.welcome_message.is_empty()
            && !self.nat_address.is_empty()
            && self.payment_enabled != self.rpc_endpoint.is_empty()
    }

    pub fn from_node_config(config: &NodeConfig) -> Self {
        Self {
            password: config.password.duplicate(),
            welcome_message: config.welcome_message.clone(),
            payment_enabled: config.payment_enabled,
            nat_address: config.nat_address.clone(),
            rpc_endpoint: config.rpc_endpoint.clone(),
        }
    }

    pub fn into_node_config(self, storage_path: impl Into<PathBuf>) -> NodeConfig {
        let SavedConfig {
            password,
            welcome_message,
            payment_enabled,
            nat_address,
            rpc_endpoint,
        } = self;
        NodeConfig {
            storage_path: storage_path.into(),
            password,
            welcome_message,
            payment_enabled,
            nat_address,
            rpc_endpoint,
        }
    }
}
