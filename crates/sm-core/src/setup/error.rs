use serde::Serialize;

use crate::config::ConfigField;
use crate::node::{IdentityAddress, NodeMode};
use crate::startup::StartupError;

/// Errors shown by the wizard. Every variant keeps the current step active
/// and the collected configuration intact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SetupError {
    #[error("{message}")]
    Validation { message: String },

    #[error("cannot reach {endpoint}: {detail}")]
    EndpointUnreachable { endpoint: String, detail: String },

    #[error("{endpoint} rejected the chain identity query: {detail}")]
    EndpointRejected { endpoint: String, detail: String },

    #[error("configuration is incomplete: {}", join_fields(.fields))]
    IncompleteConfig { fields: Vec<ConfigField> },

    #[error("failed to start node {}: {cause}", .recovery_address.shortened())]
    StartupFailed {
        recovery_address: IdentityAddress,
        cause: String,
    },

    #[error("failed to start node and to read its address: {cause}")]
    RecoveryUnavailable { cause: String },

    #[error("node started in {actual} mode but {requested} mode was requested")]
    ModeMismatch {
        requested: NodeMode,
        actual: NodeMode,
    },

    #[error("node started but the configuration could not be saved: {cause}")]
    PersistFailed { cause: String },
}

impl SetupError {
    pub fn blank_password() -> Self {
        SetupError::Validation {
            message: "password cannot be blank".to_string(),
        }
    }

    /// Raised by a node start rather than by a wizard step.
    pub fn is_startup_failure(&self) -> bool {
        matches!(
            self,
            SetupError::StartupFailed { .. }
                | SetupError::RecoveryUnavailable { .. }
                | SetupError::ModeMismatch { .. }
                | SetupError::PersistFailed { .. }
        )
    }
}

impl From<StartupError> for SetupError {
    fn from(err: StartupError) -> Self {
        match err {
            StartupError::BlankPassword => SetupError::blank_password(),
            StartupError::IncompleteConfig { fields } => SetupError::IncompleteConfig { fields },
            StartupError::StartFailed {
                recovery_address,
                cause,
            } => SetupError::StartupFailed {
                recovery_address,
                cause,
            },
            StartupError::RecoveryUnavailable { cause, .. } => {
                SetupError::RecoveryUnavailable { cause }
            }
            StartupError::ModeMismatch { requested, actual } => {
                SetupError::ModeMismatch { requested, actual }
            }
            StartupError::PersistFailed { cause } => SetupError::PersistFailed { cause },
        }
    }
}

fn join_fields(fields: &[ConfigField]) -> String {
    fields
        .iter()
        .map(ConfigField::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            SetupError::blank_password().to_string(),
            "password cannot be blank"
        );
        let err = SetupError::IncompleteConfig {
            fields: vec![ConfigField::Password, ConfigField::RpcEndpoint],
        };
        assert_eq!(
            err.to_string(),
            "configuration is incomplete: password, rpcEndpoint"
        );
    }

    #[test]
    fn startup_failure_shows_shortened_address() {
        let err = SetupError::StartupFailed {
            recovery_address: IdentityAddress::new(
                "0xabcdef0123456789abcdef0123456789abcdef01",
            ),
            cause: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to start node 0xabcd[...]cdef01: boom"
        );
    }

    #[test]
    fn startup_errors_map_onto_wizard_errors() {
        let err: SetupError = StartupError::RecoveryUnavailable {
            start_cause: "exit 1".to_string(),
            cause: "no keystore".to_string(),
        }
        .into();
        assert_eq!(
            err,
            SetupError::RecoveryUnavailable {
                cause: "no keystore".to_string()
            }
        );
    }
}
