//! Setup wizard state machine.
//!
//! Pure transition function: no I/O, no clock, no logging. Effects are
//! returned as [`SetupAction`]s and executed by the orchestrator, which
//! reports their results back as events.
//!
//! Forward order:
//! `Password → WelcomeMessage → ModeSelect → NatAddress → [RpcEndpoint] → Confirm`
//!
//! `RpcEndpoint` only exists when payments are enabled.
//!
//! `Back` clears the field of the step being left and the field of the step
//! it lands on, so a re-entered step always starts empty.

use crate::config::{NodeConfig, DEFAULT_RPC_ENDPOINT, DEFAULT_WELCOME_MESSAGE};
use crate::security::SecretString;
use crate::setup::{SetupAction, SetupError, SetupEvent, SetupNotice, SetupState};

pub struct SetupStateMachine;

impl SetupStateMachine {
    pub fn transition(
        state: SetupState,
        mut config: NodeConfig,
        event: SetupEvent,
    ) -> (SetupState, NodeConfig, Vec<SetupAction>) {
        match (state, event) {
            // ---- Password ----
            (SetupState::Password { .. }, SetupEvent::SubmitPassword { password }) => {
                if password.is_empty() {
                    return (
                        SetupState::Password {
                            error: Some(SetupError::blank_password()),
                        },
                        config,
                        Vec::new(),
                    );
                }
                config.password = password;
                (SetupState::WelcomeMessage, config, Vec::new())
            }
            (state @ SetupState::Password { .. }, SetupEvent::Back) => (state, config, Vec::new()),

            // ---- WelcomeMessage ----
            (SetupState::WelcomeMessage, SetupEvent::SubmitWelcomeMessage { message }) => {
                let mut actions = Vec::new();
                if message.is_empty() {
                    config.welcome_message = DEFAULT_WELCOME_MESSAGE.to_string();
                    actions.push(SetupAction::Notice(SetupNotice::WelcomeMessageDefaulted {
                        message: DEFAULT_WELCOME_MESSAGE.to_string(),
                    }));
                } else {
                    config.welcome_message = message;
                }
                (SetupState::ModeSelect, config, actions)
            }
            (SetupState::WelcomeMessage, SetupEvent::Back) => {
                config.welcome_message.clear();
                Self::reenter(SetupState::Password { error: None }, config)
            }

            // ---- ModeSelect ----
            (SetupState::ModeSelect, SetupEvent::SelectMode { mode }) => {
                config.payment_enabled = mode.payment_enabled();
                if !config.payment_enabled {
                    config.rpc_endpoint.clear();
                }
                (SetupState::NatAddress, config, Vec::new())
            }
            (SetupState::ModeSelect, SetupEvent::Back) => {
                config.payment_enabled = false;
                Self::reenter(SetupState::WelcomeMessage, config)
            }

            // ---- NatAddress ----
            (SetupState::NatAddress, SetupEvent::SubmitNatAddress { address }) => {
                let mut actions = Vec::new();
                if address.is_empty() {
                    actions.push(SetupAction::Notice(SetupNotice::NatAddressBlank));
                }
                config.nat_address = address;
                let next = if config.payment_enabled {
                    SetupState::RpcEndpoint { error: None }
                } else {
                    SetupState::Confirm { error: None }
                };
                (next, config, actions)
            }
            (SetupState::NatAddress, SetupEvent::Back) => {
                config.nat_address.clear();
                Self::reenter(SetupState::ModeSelect, config)
            }

            // ---- RpcEndpoint ----
            (SetupState::RpcEndpoint { .. }, SetupEvent::SubmitRpcEndpoint { endpoint }) => {
                let mut actions = Vec::new();
                let endpoint = if endpoint.is_empty() {
                    actions.push(SetupAction::Notice(SetupNotice::RpcEndpointDefaulted {
                        endpoint: DEFAULT_RPC_ENDPOINT.to_string(),
                    }));
                    DEFAULT_RPC_ENDPOINT.to_string()
                } else {
                    endpoint
                };
                actions.push(SetupAction::ProbeEndpoint {
                    endpoint: endpoint.clone(),
                });
                (SetupState::VerifyingEndpoint { endpoint }, config, actions)
            }
            (SetupState::RpcEndpoint { .. }, SetupEvent::Back) => {
                config.rpc_endpoint.clear();
                Self::reenter(SetupState::NatAddress, config)
            }

            // ---- VerifyingEndpoint ----
            (
                SetupState::VerifyingEndpoint { endpoint: pending },
                SetupEvent::EndpointVerified { endpoint, .. },
            ) if pending == endpoint => {
                config.rpc_endpoint = endpoint;
                (SetupState::Confirm { error: None }, config, Vec::new())
            }
            (SetupState::VerifyingEndpoint { .. }, SetupEvent::EndpointProbeFailed { error }) => (
                SetupState::RpcEndpoint { error: Some(error) },
                config,
                Vec::new(),
            ),

            // ---- Confirm ----
            (SetupState::Confirm { .. }, SetupEvent::Start) => {
                let missing = config.missing_fields();
                if !missing.is_empty() {
                    return (
                        SetupState::Confirm {
                            error: Some(SetupError::IncompleteConfig { fields: missing }),
                        },
                        config,
                        Vec::new(),
                    );
                }
                (SetupState::Starting, config, vec![SetupAction::StartNode])
            }
            (SetupState::Confirm { .. }, SetupEvent::Back) => {
                let previous = if config.payment_enabled {
                    SetupState::RpcEndpoint { error: None }
                } else {
                    SetupState::NatAddress
                };
                Self::reenter(previous, config)
            }

            // ---- Starting ----
            (SetupState::Starting, SetupEvent::StartupSucceeded { identity_address }) => (
                SetupState::Running { identity_address },
                config,
                Vec::new(),
            ),
            (SetupState::Starting, SetupEvent::StartupFailed { error }) => (
                SetupState::Confirm { error: Some(error) },
                config,
                Vec::new(),
            ),
            (SetupState::Starting, SetupEvent::StartupInconsistent { requested, actual }) => (
                SetupState::Inconsistent { requested, actual },
                config,
                Vec::new(),
            ),

            (state, _event) => (state, config, Vec::new()),
        }
    }

    /// Lands on `step` going backwards, clearing the field it collects.
    fn reenter(
        step: SetupState,
        mut config: NodeConfig,
    ) -> (SetupState, NodeConfig, Vec<SetupAction>) {
        match step {
            SetupState::Password { .. } => config.password = SecretString::empty(),
            SetupState::WelcomeMessage => config.welcome_message.clear(),
            SetupState::ModeSelect => {
                config.payment_enabled = false;
                config.rpc_endpoint.clear();
            }
            SetupState::NatAddress => config.nat_address.clear(),
            SetupState::RpcEndpoint { .. } => config.rpc_endpoint.clear(),
            _ => {}
        }
        (step, config, Vec::new())
    }
}
