//! Event ports that print wizard and startup progress to the terminal.

use async_trait::async_trait;

use sm_core::ports::{SetupEventPort, StartupEventPort};
use sm_core::{SetupNotice, SetupState, StartupPhase};

use super::console::Console;

pub struct TerminalEvents {
    console: Console,
}

impl TerminalEvents {
    pub fn new(console: Console) -> Self {
        Self { console }
    }
}

#[async_trait]
impl SetupEventPort for TerminalEvents {
    async fn emit_setup_state_changed(&self, state: SetupState) {
        // Start progress and failures arrive as startup phases.
        if let Some(error) = state.error() {
            if !error.is_startup_failure() {
                self.console.line(format!("error: {error}"));
            }
            return;
        }
        if let SetupState::VerifyingEndpoint { endpoint } = state {
            self.console.line(format!("Checking {endpoint} ..."));
        }
    }

    async fn emit_setup_notice(&self, notice: SetupNotice) {
        self.console.line(format!("note: {notice}"));
    }
}

#[async_trait]
impl StartupEventPort for TerminalEvents {
    async fn emit_startup_phase(&self, phase: StartupPhase) {
        let text = match phase {
            StartupPhase::Resuming => {
                "Found a saved configuration, starting the node. Please wait.".to_string()
            }
            StartupPhase::Starting { mode } => format!("Starting {mode} node"),
            StartupPhase::Running {
                mode,
                identity_address,
            } => format!("Node running in {mode} mode, address {identity_address}"),
            StartupPhase::Failed { message } => format!("error: {message}"),
            StartupPhase::Inconsistent { requested, actual } => format!(
                "error: node started in {actual} mode but {requested} mode was requested; \
                 it will not be used"
            ),
        };
        self.console.line(text);
    }
}
