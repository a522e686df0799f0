//! Configuration records.
//!
//! - [`NodeConfig`]: the record the setup wizard accumulates
//! - [`SavedConfig`]: its projection in the settings store
//! - [`AppConfig`]: deployment configuration read from TOML

pub mod app_config;
mod node_config;
mod saved;

pub use app_config::AppConfig;
pub use node_config::{ConfigField, NodeConfig, DEFAULT_RPC_ENDPOINT, DEFAULT_WELCOME_MESSAGE};
pub use saved::{keys, SavedConfig};
