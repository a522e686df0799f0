//! # sm-core
//!
//! Core domain models and business logic for Swarm Mobile.
//!
//! This crate contains pure business logic without any infrastructure dependencies:
//! the node configuration record, the setup wizard state machine, startup errors
//! and the ports implemented by the infrastructure and platform layers.

pub mod app_dirs;
pub mod config;
pub mod node;
pub mod ports;
pub mod security;
pub mod setup;
pub mod startup;

// Re-export commonly used types at the crate root
pub use config::{AppConfig, ConfigField, NodeConfig, SavedConfig};
pub use node::{
    ChainId, IdentityAddress, Network, NetworkProfile, NodeMode, NodeStartDescriptor,
    NODE_VERBOSITY,
};
pub use security::SecretString;
pub use setup::{SetupAction, SetupError, SetupEvent, SetupNotice, SetupState, SetupStateMachine};
pub use startup::{StartupError, StartupPhase};
