//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases in `sm-app` and the
//! adapters in `sm-infra` / `sm-platform`. The core never depends on a
//! concrete store, HTTP client or process runner.

pub mod app_dirs;
pub mod chain_probe;
pub mod errors;
pub mod node_service;
pub mod preferences;
mod setup_event_port;
mod startup_event_port;

pub use app_dirs::AppDirsPort;
pub use chain_probe::ChainProbePort;
pub use errors::{AppDirsError, ProbeError};
pub use node_service::{NodeServicePort, RunningNodePort};
pub use preferences::{PreferenceValue, PreferencesPort};
pub use setup_event_port::SetupEventPort;
pub use startup_event_port::StartupEventPort;

#[cfg(test)]
mod tests;
