use serde::Serialize;

/// Side effects produced by wizard transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupAction {
    /// Tell the operator (and the log) that a blank input was substituted.
    Notice(SetupNotice),

    /// Verify the endpoint with the chain prober.
    ProbeEndpoint { endpoint: String },

    /// Hand the finalized configuration to the startup orchestrator.
    StartNode,
}

/// Non-blocking information about how an input was interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SetupNotice {
    WelcomeMessageDefaulted { message: String },
    RpcEndpointDefaulted { endpoint: String },
    NatAddressBlank,
}

impl std::fmt::Display for SetupNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupNotice::WelcomeMessageDefaulted { message } => {
                write!(f, "welcome message is blank, using default: {message}")
            }
            SetupNotice::RpcEndpointDefaulted { endpoint } => {
                write!(f, "RPC endpoint is blank, using default: {endpoint}")
            }
            SetupNotice::NatAddressBlank => f.write_str("NAT address is blank"),
        }
    }
}
