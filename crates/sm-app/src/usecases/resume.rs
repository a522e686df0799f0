//! Resume path: start directly from a complete saved configuration.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, info_span, Instrument};

use sm_core::ports::{PreferencesPort, StartupEventPort};
use sm_core::StartupPhase;

use crate::usecases::startup::{LoadSavedConfig, StartupOrchestrator, StartupOutcome};

#[derive(Debug)]
pub enum ResumeOutcome {
    /// No complete saved configuration; run the wizard.
    NeedsSetup,
    /// A saved configuration was found and a start was attempted.
    Started(StartupOutcome),
}

pub struct ResumeFromSavedConfig {
    load: LoadSavedConfig,
    startup: Arc<StartupOrchestrator>,
    startup_events: Arc<dyn StartupEventPort>,
    storage_path: PathBuf,
}

impl ResumeFromSavedConfig {
    pub fn new(
        preferences: Arc<dyn PreferencesPort>,
        startup: Arc<StartupOrchestrator>,
        startup_events: Arc<dyn StartupEventPort>,
        storage_path: PathBuf,
    ) -> Self {
        Self {
            load: LoadSavedConfig::new(preferences),
            startup,
            startup_events,
            storage_path,
        }
    }

    pub async fn execute(&self) -> ResumeOutcome {
        let span = info_span!("usecase.resume.execute");

        async {
            let saved = match self.load.execute() {
                Ok(saved) => saved,
                Err(err) => {
                    error!(error = %err, "failed to read saved configuration, running setup");
                    return ResumeOutcome::NeedsSetup;
                }
            };

            if !saved.is_complete() {
                info!("no complete saved configuration, running setup");
                return ResumeOutcome::NeedsSetup;
            }

            info!(payment_enabled = saved.payment_enabled, "resuming from saved configuration");
            self.startup_events
                .emit_startup_phase(StartupPhase::Resuming)
                .await;
            let config = saved.into_node_config(self.storage_path.clone());
            ResumeOutcome::Started(self.startup.start(&config).await)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::startup::test_support::{FakeNodeService, RecordingStartupEvents};
    use sm_core::config::keys;
    use sm_core::ports::PreferenceValue;
    use sm_core::{NetworkProfile, NodeMode};
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    #[derive(Default)]
    struct MemoryPreferences {
        values: StdMutex<HashMap<String, PreferenceValue>>,
        broken: bool,
    }

    impl MemoryPreferences {
        fn seeded(entries: &[(&str, PreferenceValue)]) -> Self {
            let prefs = Self::default();
            for (key, value) in entries {
                prefs
                    .values
                    .lock()
                    .unwrap()
                    .insert(key.to_string(), value.clone());
            }
            prefs
        }
    }

    impl PreferencesPort for MemoryPreferences {
        fn get_string(&self, key: &str) -> anyhow::Result<String> {
            if self.broken {
                anyhow::bail!("corrupt preferences");
            }
            Ok(match self.values.lock().unwrap().get(key) {
                Some(PreferenceValue::String(v)) => v.clone(),
                _ => String::new(),
            })
        }

        fn get_bool(&self, key: &str) -> anyhow::Result<bool> {
            Ok(matches!(
                self.values.lock().unwrap().get(key),
                Some(PreferenceValue::Bool(true))
            ))
        }

        fn set_string(&self, key: &str, value: &str) -> anyhow::Result<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), PreferenceValue::String(value.to_string()));
            Ok(())
        }

        fn set_bool(&self, key: &str, value: bool) -> anyhow::Result<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), PreferenceValue::Bool(value));
            Ok(())
        }
    }

    fn minimal_entries() -> Vec<(&'static str, PreferenceValue)> {
        vec![
            (keys::PASSWORD, PreferenceValue::String("Secr3t!".into())),
            (keys::WELCOME_MESSAGE, PreferenceValue::String("hi".into())),
            (keys::PAYMENT_ENABLED, PreferenceValue::Bool(false)),
            (keys::NAT_ADDRESS, PreferenceValue::String("1.2.3.4:1634".into())),
            (keys::RPC_ENDPOINT, PreferenceValue::String(String::new())),
        ]
    }

    fn resume(
        prefs: MemoryPreferences,
        node_service: Arc<FakeNodeService>,
        events: Arc<RecordingStartupEvents>,
    ) -> ResumeFromSavedConfig {
        let prefs: Arc<MemoryPreferences> = Arc::new(prefs);
        let startup = Arc::new(StartupOrchestrator::new(
            node_service,
            prefs.clone(),
            events.clone(),
            NetworkProfile::mainnet(),
            Duration::from_secs(5),
        ));
        ResumeFromSavedConfig::new(prefs, startup, events, PathBuf::from("/data/node"))
    }

    #[tokio::test]
    async fn complete_config_starts_without_wizard() {
        let node_service = Arc::new(FakeNodeService::running(NodeMode::Minimal));
        let events = Arc::new(RecordingStartupEvents::default());
        let usecase = resume(
            MemoryPreferences::seeded(&minimal_entries()),
            node_service.clone(),
            events.clone(),
        );

        let outcome = usecase.execute().await;

        assert!(matches!(
            outcome,
            ResumeOutcome::Started(StartupOutcome::Running(_))
        ));
        assert_eq!(node_service.start_count(), 1);
        assert_eq!(events.names(), vec!["resuming", "starting", "running"]);
        let descriptors = node_service.descriptors.lock().unwrap();
        assert_eq!(descriptors[0].data_dir, PathBuf::from("/data/node"));
    }

    #[tokio::test]
    async fn first_run_needs_setup() {
        let node_service = Arc::new(FakeNodeService::running(NodeMode::Minimal));
        let events = Arc::new(RecordingStartupEvents::default());
        let usecase = resume(MemoryPreferences::default(), node_service.clone(), events.clone());

        assert!(matches!(usecase.execute().await, ResumeOutcome::NeedsSetup));
        assert_eq!(node_service.start_count(), 0);
        assert!(events.names().is_empty());
    }

    #[tokio::test]
    async fn inconsistent_saved_config_needs_setup() {
        let mut entries = minimal_entries();
        entries[2] = (keys::PAYMENT_ENABLED, PreferenceValue::Bool(true));
        let node_service = Arc::new(FakeNodeService::running(NodeMode::Payment));
        let usecase = resume(
            MemoryPreferences::seeded(&entries),
            node_service.clone(),
            Arc::new(RecordingStartupEvents::default()),
        );

        assert!(matches!(usecase.execute().await, ResumeOutcome::NeedsSetup));
        assert_eq!(node_service.start_count(), 0);
    }

    #[tokio::test]
    async fn unreadable_store_falls_back_to_setup() {
        let prefs = MemoryPreferences {
            broken: true,
            ..MemoryPreferences::seeded(&minimal_entries())
        };
        let node_service = Arc::new(FakeNodeService::running(NodeMode::Minimal));
        let usecase = resume(
            prefs,
            node_service.clone(),
            Arc::new(RecordingStartupEvents::default()),
        );

        assert!(matches!(usecase.execute().await, ResumeOutcome::NeedsSetup));
        assert_eq!(node_service.start_count(), 0);
    }
}
