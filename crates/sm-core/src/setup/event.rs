use crate::node::{ChainId, IdentityAddress, NodeMode};
use crate::{security::SecretString, setup::SetupError};

#[derive(Debug, PartialEq)]
pub enum SetupEvent {
    // Operator input
    SubmitPassword { password: SecretString },
    SubmitWelcomeMessage { message: String },
    SelectMode { mode: NodeMode },
    SubmitNatAddress { address: String },
    SubmitRpcEndpoint { endpoint: String },
    Start,
    Back,

    // Results (from orchestrator)
    EndpointVerified { endpoint: String, chain_id: ChainId },
    EndpointProbeFailed { error: SetupError },
    StartupSucceeded { identity_address: IdentityAddress },
    StartupFailed { error: SetupError },
    StartupInconsistent { requested: NodeMode, actual: NodeMode },
}

impl SetupEvent {
    /// Short name for logs. Never includes payloads.
    pub fn name(&self) -> &'static str {
        match self {
            SetupEvent::SubmitPassword { .. } => "submit_password",
            SetupEvent::SubmitWelcomeMessage { .. } => "submit_welcome_message",
            SetupEvent::SelectMode { .. } => "select_mode",
            SetupEvent::SubmitNatAddress { .. } => "submit_nat_address",
            SetupEvent::SubmitRpcEndpoint { .. } => "submit_rpc_endpoint",
            SetupEvent::Start => "start",
            SetupEvent::Back => "back",
            SetupEvent::EndpointVerified { .. } => "endpoint_verified",
            SetupEvent::EndpointProbeFailed { .. } => "endpoint_probe_failed",
            SetupEvent::StartupSucceeded { .. } => "startup_succeeded",
            SetupEvent::StartupFailed { .. } => "startup_failed",
            SetupEvent::StartupInconsistent { .. } => "startup_inconsistent",
        }
    }
}
