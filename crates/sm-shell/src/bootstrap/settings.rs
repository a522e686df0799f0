//! Default resolution for the deployment configuration.
//!
//! `AppConfig` carries raw facts; this is the one place where empty facts
//! become concrete values.

use std::path::PathBuf;
use std::time::Duration;

use sm_core::config::AppConfig;
use sm_core::Network;
use tracing::warn;

const DEFAULT_BEE_BINARY: &str = "bee";
const DEFAULT_NODE_API_URL: &str = "http://127.0.0.1:1633";
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub network: Network,
    pub bee_binary: PathBuf,
    pub node_api_url: String,
    /// Replaces the platform node storage location when set.
    pub data_dir: Option<PathBuf>,
    pub probe_timeout: Duration,
    pub startup_timeout: Duration,
    pub status_interval: Duration,
}

impl RuntimeSettings {
    pub fn resolve(config: &AppConfig) -> Self {
        let network = if config.network.trim().is_empty() {
            Network::default()
        } else {
            config.network.parse().unwrap_or_else(|err: String| {
                warn!(error = %err, "falling back to mainnet");
                Network::default()
            })
        };

        Self {
            network,
            bee_binary: if config.bee_binary.as_os_str().is_empty() {
                PathBuf::from(DEFAULT_BEE_BINARY)
            } else {
                config.bee_binary.clone()
            },
            node_api_url: if config.node_api_url.trim().is_empty() {
                DEFAULT_NODE_API_URL.to_string()
            } else {
                config.node_api_url.trim().to_string()
            },
            data_dir: if config.data_dir.as_os_str().is_empty() {
                None
            } else {
                Some(config.data_dir.clone())
            },
            probe_timeout: secs_or(config.probe_timeout_secs, DEFAULT_PROBE_TIMEOUT),
            startup_timeout: secs_or(config.startup_timeout_secs, DEFAULT_STARTUP_TIMEOUT),
            status_interval: secs_or(config.status_interval_secs, DEFAULT_STATUS_INTERVAL),
        }
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self::resolve(&AppConfig::empty())
    }
}

fn secs_or(secs: u64, default: Duration) -> Duration {
    if secs == 0 {
        default
    } else {
        Duration::from_secs(secs)
    }
}
