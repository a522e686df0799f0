//! Setup orchestrator.
//!
//! This module coordinates the wizard state machine and its side effects.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument};

use sm_core::ports::{ChainProbePort, ProbeError, SetupEventPort};
use sm_core::{
    NodeConfig, NodeMode, SecretString, SetupAction, SetupError, SetupEvent, SetupNotice,
    SetupState, SetupStateMachine,
};

use crate::usecases::setup::context::SetupContext;
use crate::usecases::startup::{StartupOrchestrator, StartupOutcome};

/// Orchestrator that drives wizard state and side effects.
pub struct SetupOrchestrator {
    context: Arc<SetupContext>,
    chain_probe: Arc<dyn ChainProbePort>,
    probe_timeout: Duration,
    startup: Arc<StartupOrchestrator>,
    setup_events: Arc<dyn SetupEventPort>,
    /// Outcome of the last `StartNode` action, until the caller takes it.
    outcome: Mutex<Option<StartupOutcome>>,
}

impl SetupOrchestrator {
    pub fn new(
        context: Arc<SetupContext>,
        chain_probe: Arc<dyn ChainProbePort>,
        probe_timeout: Duration,
        startup: Arc<StartupOrchestrator>,
        setup_events: Arc<dyn SetupEventPort>,
    ) -> Self {
        Self {
            context,
            chain_probe,
            probe_timeout,
            startup,
            setup_events,
            outcome: Mutex::new(None),
        }
    }

    pub async fn submit_password(&self, password: String) -> SetupState {
        self.dispatch(SetupEvent::SubmitPassword {
            password: SecretString::new(password),
        })
        .await
    }

    pub async fn submit_welcome_message(&self, message: String) -> SetupState {
        self.dispatch(SetupEvent::SubmitWelcomeMessage { message })
            .await
    }

    pub async fn select_mode(&self, mode: NodeMode) -> SetupState {
        self.dispatch(SetupEvent::SelectMode { mode }).await
    }

    pub async fn submit_nat_address(&self, address: String) -> SetupState {
        self.dispatch(SetupEvent::SubmitNatAddress { address }).await
    }

    pub async fn submit_rpc_endpoint(&self, endpoint: String) -> SetupState {
        self.dispatch(SetupEvent::SubmitRpcEndpoint { endpoint })
            .await
    }

    pub async fn start(&self) -> SetupState {
        self.dispatch(SetupEvent::Start).await
    }

    pub async fn back(&self) -> SetupState {
        self.dispatch(SetupEvent::Back).await
    }

    pub async fn get_state(&self) -> SetupState {
        self.context.get_state().await
    }

    /// Copy of the values collected so far, for a confirmation summary.
    pub async fn config_snapshot(&self) -> NodeConfig {
        self.context.config_snapshot().await
    }

    /// Takes the outcome of the last node start, if any.
    pub async fn take_outcome(&self) -> Option<StartupOutcome> {
        self.outcome.lock().await.take()
    }

    async fn dispatch(&self, event: SetupEvent) -> SetupState {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let span = info_span!("usecase.setup_orchestrator.dispatch", event = event.name());
        async {
            let mut current = self.context.get_state().await;
            let mut pending_events = vec![event];

            while let Some(event) = pending_events.pop() {
                let from = current.clone();
                let event_name = event.name();
                let config = self.context.take_config().await;
                let (next, config, actions) = SetupStateMachine::transition(current, config, event);
                self.context.put_config(config).await;
                info!(from = ?from, to = ?next, event = event_name, "setup state transition");
                if let Some(err) = next.error() {
                    warn!(error = %err, "setup step rejected input");
                }

                // Published before the actions run so in-flight states are observable.
                self.set_state_and_emit(next.clone()).await;
                current = next;

                let follow_up_events = self.execute_actions(actions).await;
                pending_events.extend(follow_up_events);
            }

            current
        }
        .instrument(span)
        .await
    }

    async fn execute_actions(&self, actions: Vec<SetupAction>) -> Vec<SetupEvent> {
        let mut follow_up_events = Vec::new();
        for action in actions {
            debug!(?action, "setup executing action");
            match action {
                SetupAction::Notice(notice) => {
                    self.publish_notice(notice).await;
                }
                SetupAction::ProbeEndpoint { endpoint } => {
                    follow_up_events.push(self.probe_endpoint(endpoint).await);
                }
                SetupAction::StartNode => {
                    follow_up_events.push(self.start_node().await);
                }
            }
        }
        follow_up_events
    }

    async fn publish_notice(&self, notice: SetupNotice) {
        match &notice {
            SetupNotice::NatAddressBlank => info!("NAT address is blank"),
            SetupNotice::WelcomeMessageDefaulted { message } => {
                info!(%message, "welcome message is blank, using default")
            }
            SetupNotice::RpcEndpointDefaulted { endpoint } => {
                info!(%endpoint, "RPC endpoint is blank, using default")
            }
        }
        self.setup_events.emit_setup_notice(notice).await;
    }

    async fn probe_endpoint(&self, endpoint: String) -> SetupEvent {
        match tokio::time::timeout(self.probe_timeout, self.chain_probe.probe(&endpoint)).await {
            Ok(Ok(chain_id)) => {
                info!(%endpoint, %chain_id, "RPC endpoint verified");
                SetupEvent::EndpointVerified { endpoint, chain_id }
            }
            Ok(Err(ProbeError::Unreachable(detail))) => {
                warn!(%endpoint, %detail, "RPC endpoint unreachable");
                SetupEvent::EndpointProbeFailed {
                    error: SetupError::EndpointUnreachable { endpoint, detail },
                }
            }
            Ok(Err(ProbeError::Rejected(detail))) => {
                warn!(%endpoint, %detail, "RPC endpoint rejected chain identity query");
                SetupEvent::EndpointProbeFailed {
                    error: SetupError::EndpointRejected { endpoint, detail },
                }
            }
            Err(_) => {
                let detail = format!("no answer within {}s", self.probe_timeout.as_secs());
                warn!(%endpoint, %detail, "RPC endpoint probe timed out");
                SetupEvent::EndpointProbeFailed {
                    error: SetupError::EndpointUnreachable { endpoint, detail },
                }
            }
        }
    }

    async fn start_node(&self) -> SetupEvent {
        let config = self.context.config_snapshot().await;
        let outcome = self.startup.start(&config).await;

        let event = match &outcome {
            StartupOutcome::Running(session) => SetupEvent::StartupSucceeded {
                identity_address: session.identity_address().clone(),
            },
            // The node is up; a second start would orphan it. The caller
            // reports the save error from the outcome.
            StartupOutcome::Unsaved { session, .. } => SetupEvent::StartupSucceeded {
                identity_address: session.identity_address().clone(),
            },
            StartupOutcome::Failed(err) => SetupEvent::StartupFailed {
                error: SetupError::from(err.clone()),
            },
            StartupOutcome::Inconsistent {
                requested, actual, ..
            } => SetupEvent::StartupInconsistent {
                requested: *requested,
                actual: *actual,
            },
        };

        *self.outcome.lock().await = Some(outcome);
        event
    }

    async fn set_state_and_emit(&self, state: SetupState) {
        self.context.set_state(state.clone()).await;
        self.setup_events.emit_setup_state_changed(state).await;
    }
}
