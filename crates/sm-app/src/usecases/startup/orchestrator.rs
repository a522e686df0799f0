//! Startup orchestrator.
//!
//! Turns a finalized configuration into a running node:
//! build the start descriptor, start the node, check that the node runs in the
//! requested mode, persist the configuration and hand back a [`NodeSession`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{error, info, info_span, warn, Instrument};

use sm_core::ports::{NodeServicePort, PreferencesPort, RunningNodePort, StartupEventPort};
use sm_core::{
    NetworkProfile, NodeConfig, NodeMode, NodeStartDescriptor, StartupError, StartupPhase,
};

use super::persist::PersistConfig;
use super::session::NodeSession;

/// Result of one start attempt.
pub enum StartupOutcome {
    /// Node runs in the requested mode and the configuration is saved.
    Running(NodeSession),

    /// Node runs in the requested mode but the configuration could not be saved.
    Unsaved {
        session: NodeSession,
        error: StartupError,
    },

    /// Node did not start. Nothing was persisted.
    Failed(StartupError),

    /// Node started in another mode than requested. It is left running and
    /// handed to the caller; nothing was persisted.
    Inconsistent {
        requested: NodeMode,
        actual: NodeMode,
        node: Arc<dyn RunningNodePort>,
    },
}

impl StartupOutcome {
    pub fn error(&self) -> Option<StartupError> {
        match self {
            StartupOutcome::Running(_) => None,
            StartupOutcome::Unsaved { error, .. } | StartupOutcome::Failed(error) => {
                Some(error.clone())
            }
            StartupOutcome::Inconsistent {
                requested, actual, ..
            } => Some(StartupError::ModeMismatch {
                requested: *requested,
                actual: *actual,
            }),
        }
    }

    pub fn session(&self) -> Option<&NodeSession> {
        match self {
            StartupOutcome::Running(session) | StartupOutcome::Unsaved { session, .. } => {
                Some(session)
            }
            _ => None,
        }
    }

    pub fn into_session(self) -> Option<NodeSession> {
        match self {
            StartupOutcome::Running(session) | StartupOutcome::Unsaved { session, .. } => {
                Some(session)
            }
            _ => None,
        }
    }
}

impl std::fmt::Debug for StartupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupOutcome::Running(session) => f.debug_tuple("Running").field(session).finish(),
            StartupOutcome::Unsaved { session, error } => f
                .debug_struct("Unsaved")
                .field("session", session)
                .field("error", error)
                .finish(),
            StartupOutcome::Failed(error) => f.debug_tuple("Failed").field(error).finish(),
            StartupOutcome::Inconsistent {
                requested, actual, ..
            } => f
                .debug_struct("Inconsistent")
                .field("requested", requested)
                .field("actual", actual)
                .finish_non_exhaustive(),
        }
    }
}

pub struct StartupOrchestrator {
    node_service: Arc<dyn NodeServicePort>,
    persist: PersistConfig,
    startup_events: Arc<dyn StartupEventPort>,
    profile: NetworkProfile,
    status_interval: Duration,
    /// One start in flight per process.
    start_lock: Mutex<()>,
}

impl StartupOrchestrator {
    pub fn new(
        node_service: Arc<dyn NodeServicePort>,
        preferences: Arc<dyn PreferencesPort>,
        startup_events: Arc<dyn StartupEventPort>,
        profile: NetworkProfile,
        status_interval: Duration,
    ) -> Self {
        Self {
            node_service,
            persist: PersistConfig::new(preferences),
            startup_events,
            profile,
            status_interval,
            start_lock: Mutex::new(()),
        }
    }

    pub async fn start(&self, config: &NodeConfig) -> StartupOutcome {
        let _start_guard = self.start_lock.lock().await;
        let requested = config.requested_mode();
        let span = info_span!(
            "usecase.startup.start",
            requested = %requested,
            network = self.profile.network.as_str()
        );

        async {
            if config.password.is_empty() {
                return self.fail(StartupError::BlankPassword).await;
            }
            let missing = config.missing_fields();
            if !missing.is_empty() {
                return self
                    .fail(StartupError::IncompleteConfig { fields: missing })
                    .await;
            }

            let descriptor = NodeStartDescriptor::resolve(config, &self.profile);
            self.startup_events
                .emit_startup_phase(StartupPhase::Starting { mode: requested })
                .await;
            info!(
                data_dir = %descriptor.data_dir.display(),
                nat_address = %descriptor.nat_address,
                "starting node"
            );

            let node = match self
                .node_service
                .start_node(&descriptor, &config.password)
                .await
            {
                Ok(node) => node,
                Err(start_err) => {
                    error!(error = %start_err, "node start failed");
                    let err = self.recovery_error(config, start_err).await;
                    return self.fail(err).await;
                }
            };

            let actual = node.effective_mode();
            if actual != requested {
                warn!(%requested, %actual, "node mode differs from the requested mode");
                self.startup_events
                    .emit_startup_phase(StartupPhase::Inconsistent { requested, actual })
                    .await;
                return StartupOutcome::Inconsistent {
                    requested,
                    actual,
                    node,
                };
            }

            let session = NodeSession::start(node, self.status_interval);
            info!(address = %session.identity_address(), mode = %actual, "node running");

            let persisted = self.persist.execute(config);
            self.startup_events
                .emit_startup_phase(StartupPhase::Running {
                    mode: actual,
                    identity_address: session.identity_address().clone(),
                })
                .await;

            match persisted {
                Ok(()) => StartupOutcome::Running(session),
                Err(err) => {
                    error!(error = %err, "failed to persist configuration");
                    StartupOutcome::Unsaved {
                        session,
                        error: StartupError::PersistFailed {
                            cause: err.to_string(),
                        },
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    /// The recovery address derivation error wins over the start error.
    async fn recovery_error(&self, config: &NodeConfig, start_err: anyhow::Error) -> StartupError {
        match self
            .node_service
            .recover_identity_address(&config.storage_path, &config.password)
            .await
        {
            Ok(recovery_address) => StartupError::StartFailed {
                recovery_address,
                cause: format!("{start_err:#}"),
            },
            Err(recovery_err) => {
                error!(error = %recovery_err, "failed to derive recovery address");
                StartupError::RecoveryUnavailable {
                    start_cause: format!("{start_err:#}"),
                    cause: format!("{recovery_err:#}"),
                }
            }
        }
    }

    async fn fail(&self, err: StartupError) -> StartupOutcome {
        let message = sm_core::SetupError::from(err.clone()).to_string();
        self.startup_events
            .emit_startup_phase(StartupPhase::Failed { message })
            .await;
        StartupOutcome::Failed(err)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::usecases::status_poller::test_support::FakeRunningNode;
    use async_trait::async_trait;
    use sm_core::{IdentityAddress, SecretString};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;

    pub(crate) enum StartBehavior {
        Run(NodeMode),
        Fail(&'static str),
    }

    pub(crate) struct FakeNodeService {
        pub behavior: StartBehavior,
        pub recovery: Result<IdentityAddress, &'static str>,
        pub start_calls: AtomicUsize,
        pub descriptors: StdMutex<Vec<NodeStartDescriptor>>,
    }

    impl FakeNodeService {
        pub(crate) fn running(mode: NodeMode) -> Self {
            Self::with(StartBehavior::Run(mode))
        }

        pub(crate) fn failing(cause: &'static str) -> Self {
            Self::with(StartBehavior::Fail(cause))
        }

        fn with(behavior: StartBehavior) -> Self {
            Self {
                behavior,
                recovery: Ok(IdentityAddress::new(
                    "0xabcdef0123456789abcdef0123456789abcdef01",
                )),
                start_calls: AtomicUsize::new(0),
                descriptors: StdMutex::new(Vec::new()),
            }
        }

        pub(crate) fn start_count(&self) -> usize {
            self.start_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NodeServicePort for FakeNodeService {
        async fn start_node(
            &self,
            descriptor: &NodeStartDescriptor,
            _password: &SecretString,
        ) -> anyhow::Result<Arc<dyn RunningNodePort>> {
            self.start_calls.fetch_add(1, Ordering::SeqCst);
            self.descriptors.lock().unwrap().push(descriptor.clone());
            match &self.behavior {
                StartBehavior::Run(mode) => Ok(Arc::new(FakeRunningNode::new(*mode))),
                StartBehavior::Fail(cause) => Err(anyhow::anyhow!(*cause)),
            }
        }

        async fn recover_identity_address(
            &self,
            _storage_path: &Path,
            _password: &SecretString,
        ) -> anyhow::Result<IdentityAddress> {
            self.recovery.clone().map_err(|cause| anyhow::anyhow!(cause))
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingStartupEvents {
        pub phases: StdMutex<Vec<StartupPhase>>,
    }

    impl RecordingStartupEvents {
        pub(crate) fn names(&self) -> Vec<&'static str> {
            self.phases.lock().unwrap().iter().map(|p| p.name()).collect()
        }
    }

    #[async_trait]
    impl StartupEventPort for RecordingStartupEvents {
        async fn emit_startup_phase(&self, phase: StartupPhase) {
            self.phases.lock().unwrap().push(phase);
        }
    }
}
