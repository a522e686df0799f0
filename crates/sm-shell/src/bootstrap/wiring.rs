//! # Dependency Injection
//!
//! The only place that depends on `sm-infra`, `sm-platform` and `sm-app` at
//! once. Assembly only: no decisions about what to run are made here.

use std::sync::Arc;

use sm_app::{AppDeps, AppPaths, StartupSettings};
use sm_core::ports::AppDirsPort;
use sm_infra::{FilePreferencesStore, JsonRpcChainProber};
use sm_platform::{BeeNodeService, BeeServiceOptions};

use super::settings::RuntimeSettings;
use crate::adapters::TerminalEvents;

pub type WiringResult<T> = Result<T, WiringError>;

#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("App directories unavailable: {0}")]
    AppDirs(String),

    #[error("Chain prober initialization failed: {0}")]
    ChainProbe(String),
}

/// Platform locations, with the configured data dir taking over node storage.
pub fn resolve_app_paths(
    app_dirs: &dyn AppDirsPort,
    settings: &RuntimeSettings,
) -> WiringResult<AppPaths> {
    let dirs = app_dirs
        .get_app_dirs()
        .map_err(|e| WiringError::AppDirs(e.to_string()))?;
    let mut paths = AppPaths::from_app_dirs(&dirs);
    if let Some(data_dir) = &settings.data_dir {
        paths.storage_path = data_dir.clone();
    }
    Ok(paths)
}

pub fn wire_dependencies(
    settings: &RuntimeSettings,
    paths: &AppPaths,
    events: Arc<TerminalEvents>,
) -> WiringResult<AppDeps> {
    let profile = settings.network.profile();

    let preferences = Arc::new(FilePreferencesStore::new(paths.preferences_path.clone()));
    let chain_probe = Arc::new(
        JsonRpcChainProber::new(settings.probe_timeout, profile.expected_chain_id)
            .map_err(|e| WiringError::ChainProbe(e.to_string()))?,
    );
    let node_service = Arc::new(BeeNodeService::new(BeeServiceOptions {
        bee_binary: settings.bee_binary.clone(),
        api_url: settings.node_api_url.clone(),
        startup_timeout: settings.startup_timeout,
        ..BeeServiceOptions::default()
    }));

    Ok(AppDeps {
        preferences,
        node_service,
        chain_probe,
        setup_events: events.clone(),
        startup_events: events,
    })
}

pub fn startup_settings(settings: &RuntimeSettings, paths: &AppPaths) -> StartupSettings {
    StartupSettings {
        storage_path: paths.storage_path.clone(),
        profile: settings.network.profile(),
        probe_timeout: settings.probe_timeout,
        status_interval: settings.status_interval,
    }
}
