//! Node startup domain types.

use serde::Serialize;

use crate::config::ConfigField;
use crate::node::{IdentityAddress, NodeMode};

/// Why a start attempt did not yield a usable running node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StartupError {
    #[error("password cannot be blank")]
    BlankPassword,

    #[error("configuration is incomplete: {fields:?}")]
    IncompleteConfig { fields: Vec<ConfigField> },

    /// The node did not start; `recovery_address` was derived from the keystore.
    #[error("node failed to start ({recovery_address}): {cause}")]
    StartFailed {
        recovery_address: IdentityAddress,
        cause: String,
    },

    /// The node did not start and the keystore could not be read either.
    /// `cause` is the derivation error, which is what the operator sees.
    #[error("identity address unavailable: {cause} (start error: {start_cause})")]
    RecoveryUnavailable { start_cause: String, cause: String },

    #[error("node reports {actual} mode, {requested} was requested")]
    ModeMismatch {
        requested: NodeMode,
        actual: NodeMode,
    },

    #[error("failed to persist configuration: {cause}")]
    PersistFailed { cause: String },
}

/// Startup progress as seen by the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum StartupPhase {
    /// A saved configuration was found; please wait.
    Resuming,
    Starting { mode: NodeMode },
    Running {
        mode: NodeMode,
        identity_address: IdentityAddress,
    },
    Failed { message: String },
    Inconsistent {
        requested: NodeMode,
        actual: NodeMode,
    },
}

impl StartupPhase {
    pub fn name(&self) -> &'static str {
        match self {
            StartupPhase::Resuming => "resuming",
            StartupPhase::Starting { .. } => "starting",
            StartupPhase::Running { .. } => "running",
            StartupPhase::Failed { .. } => "failed",
            StartupPhase::Inconsistent { .. } => "inconsistent",
        }
    }
}
