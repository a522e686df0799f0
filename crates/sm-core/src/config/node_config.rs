use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::node::NodeMode;
use crate::security::SecretString;

/// Greeting used when the operator leaves the welcome message blank.
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome from Swarm Mobile by Solar Punk";

/// Chain endpoint used when the operator leaves the RPC endpoint blank.
pub const DEFAULT_RPC_ENDPOINT: &str = "https://gnosis.publicnode.com";

/// Field of [`NodeConfig`], used to name missing or inconsistent values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigField {
    StoragePath,
    Password,
    WelcomeMessage,
    PaymentEnabled,
    NatAddress,
    RpcEndpoint,
}

impl ConfigField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigField::StoragePath => "storagePath",
            ConfigField::Password => "password",
            ConfigField::WelcomeMessage => "welcomeMessage",
            ConfigField::PaymentEnabled => "paymentEnabled",
            ConfigField::NatAddress => "natAddress",
            ConfigField::RpcEndpoint => "rpcEndpoint",
        }
    }
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node configuration collected by the setup wizard.
///
/// `storage_path` is fixed at process start; every other field is owned by
/// exactly one wizard step.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NodeConfig {
    pub storage_path: PathBuf,
    pub password: SecretString,
    pub welcome_message: String,
    pub payment_enabled: bool,
    pub nat_address: String,
    pub rpc_endpoint: String,
}

impl NodeConfig {
    /// Empty record bound to the node storage location.
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            ..Default::default()
        }
    }

    pub fn requested_mode(&self) -> NodeMode {
        NodeMode::from_payment_enabled(self.payment_enabled)
    }

    /// `paymentEnabled == true ⇔ rpcEndpoint != ""`
    pub fn endpoint_matches_mode(&self) -> bool {
        self.payment_enabled != self.rpc_endpoint.is_empty()
    }

    /// Fields that block startup, in declaration order. Empty means startable.
    pub fn missing_fields(&self) -> Vec<ConfigField> {
        let mut missing = Vec::new();
        if self.storage_path.as_os_str().is_empty() {
            missing.push(ConfigField::StoragePath);
        }
        if self.password.is_empty() {
            missing.push(ConfigField::Password);
        }
        if !self.endpoint_matches_mode() {
            missing.push(ConfigField::RpcEndpoint);
        }
        missing
    }

    /// Explicit copy; the password is duplicated on purpose.
    pub fn duplicate(&self) -> Self {
        Self {
            storage_path: self.storage_path.clone(),
            password: self.password.duplicate(),
            welcome_message: self.welcome_message.clone(),
            payment_enabled: self.payment_enabled,
            nat_address: self.nat_address.clone(),
            rpc_endpoint: self.rpc_endpoint.clone(),
        }
    }
}
