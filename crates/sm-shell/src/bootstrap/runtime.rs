//! Assembled application runtime and its use case accessor.

use std::sync::Arc;

use sm_app::usecases::{ResumeFromSavedConfig, SetupContext, SetupOrchestrator, StartupOrchestrator};
use sm_app::{AppDeps, StartupSettings};
use sm_core::NodeConfig;

/// Holds the wired ports plus the one startup orchestrator of the process.
pub struct AppRuntime {
    deps: AppDeps,
    settings: StartupSettings,
    /// Shared so the resume path and every wizard run serialize their starts.
    startup: Arc<StartupOrchestrator>,
}

impl AppRuntime {
    pub fn new(deps: AppDeps, settings: StartupSettings) -> Self {
        let startup = Arc::new(StartupOrchestrator::new(
            deps.node_service.clone(),
            deps.preferences.clone(),
            deps.startup_events.clone(),
            settings.profile.clone(),
            settings.status_interval,
        ));
        Self {
            deps,
            settings,
            startup,
        }
    }

    pub fn settings(&self) -> &StartupSettings {
        &self.settings
    }

    pub fn usecases(&self) -> UseCases<'_> {
        UseCases { runtime: self }
    }
}

pub struct UseCases<'a> {
    runtime: &'a AppRuntime,
}

impl UseCases<'_> {
    pub fn resume_from_saved_config(&self) -> ResumeFromSavedConfig {
        let rt = self.runtime;
        ResumeFromSavedConfig::new(
            rt.deps.preferences.clone(),
            rt.startup.clone(),
            rt.deps.startup_events.clone(),
            rt.settings.storage_path.clone(),
        )
    }

    /// A fresh wizard at the password step with an empty configuration.
    pub fn setup_wizard(&self) -> Arc<SetupOrchestrator> {
        let rt = self.runtime;
        let context =
            SetupContext::starting_with(NodeConfig::new(rt.settings.storage_path.clone())).arc();
        Arc::new(SetupOrchestrator::new(
            context,
            rt.deps.chain_probe.clone(),
            rt.settings.probe_timeout,
            rt.startup.clone(),
            rt.deps.setup_events.clone(),
        ))
    }
}
