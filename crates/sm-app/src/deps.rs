//! # Application Dependencies
//!
//! Parameter grouping for constructing the use cases. Not a builder: every
//! field is required, nothing is defaulted here.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sm_core::ports::{
    ChainProbePort, NodeServicePort, PreferencesPort, SetupEventPort, StartupEventPort,
};
use sm_core::NetworkProfile;

pub struct AppDeps {
    // Persistence
    pub preferences: Arc<dyn PreferencesPort>,

    // Node
    pub node_service: Arc<dyn NodeServicePort>,
    pub chain_probe: Arc<dyn ChainProbePort>,

    // Presentation
    pub setup_events: Arc<dyn SetupEventPort>,
    pub startup_events: Arc<dyn StartupEventPort>,
}

/// Resolved runtime knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupSettings {
    pub storage_path: PathBuf,
    pub profile: NetworkProfile,
    pub probe_timeout: Duration,
    pub status_interval: Duration,
}
