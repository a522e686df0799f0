//! Terminal driver for the setup wizard.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncRead;

use sm_app::usecases::{SetupOrchestrator, StartupOutcome};
use sm_core::config::DEFAULT_RPC_ENDPOINT;
use sm_core::{NodeConfig, NodeMode, SetupState};

use super::console::Console;
use super::prompt::{wait_with_progress, Answer, Prompter, BACK_COMMAND};

const PROGRESS_TICK: Duration = Duration::from_secs(1);
const IN_FLIGHT_POLL: Duration = Duration::from_millis(100);

/// Runs the wizard until a node start reaches a terminal state.
///
/// Returns `None` when the input closes first.
pub async fn drive_wizard<R>(
    wizard: Arc<SetupOrchestrator>,
    prompter: &mut Prompter<R>,
) -> anyhow::Result<Option<StartupOutcome>>
where
    R: AsyncRead + Unpin,
{
    prompter
        .console()
        .line(format!("Type {BACK_COMMAND} at any prompt to go back."));

    loop {
        let state = wizard.get_state().await;
        let question = match &state {
            SetupState::Password { .. } => "Node password:".to_string(),
            SetupState::WelcomeMessage => "Welcome message (blank for default):".to_string(),
            SetupState::ModeSelect => "Enable the payment channel? [y/N]:".to_string(),
            SetupState::NatAddress => "NAT address, host:port (blank for none):".to_string(),
            SetupState::RpcEndpoint { .. } => {
                format!("Gnosis Chain RPC endpoint [{DEFAULT_RPC_ENDPOINT}]:")
            }
            SetupState::Confirm { .. } => {
                print_summary(prompter.console(), &wizard.config_snapshot().await);
                "Start the node? [Y/n]:".to_string()
            }
            SetupState::Running { .. } | SetupState::Inconsistent { .. } => {
                return Ok(wizard.take_outcome().await);
            }
            SetupState::VerifyingEndpoint { .. } | SetupState::Starting => {
                tokio::time::sleep(IN_FLIGHT_POLL).await;
                continue;
            }
        };

        let answer = match prompter.ask(&question).await? {
            Answer::Eof => return Ok(None),
            Answer::Back => {
                wizard.back().await;
                continue;
            }
            Answer::Text(text) => text,
        };

        match state {
            SetupState::Password { .. } => {
                wizard.submit_password(answer).await;
            }
            SetupState::WelcomeMessage => {
                wizard
                    .submit_welcome_message(answer.trim().to_string())
                    .await;
            }
            SetupState::ModeSelect => match parse_mode(&answer) {
                Some(mode) => {
                    wizard.select_mode(mode).await;
                }
                None => prompter.console().line("Please answer y or n."),
            },
            SetupState::NatAddress => {
                wizard.submit_nat_address(answer.trim().to_string()).await;
            }
            SetupState::RpcEndpoint { .. } => {
                wizard.submit_rpc_endpoint(answer.trim().to_string()).await;
            }
            SetupState::Confirm { .. } => match parse_confirm(&answer) {
                Some(true) => {
                    let task = {
                        let wizard = wizard.clone();
                        tokio::spawn(async move { wizard.start().await })
                    };
                    wait_with_progress(prompter.console(), "Starting", PROGRESS_TICK, task)
                        .await?;
                }
                Some(false) => {
                    wizard.back().await;
                }
                None => prompter.console().line("Please answer y or n."),
            },
            _ => {}
        }
    }
}

fn print_summary(console: &Console, config: &NodeConfig) {
    let or_none = |value: &str| {
        if value.is_empty() {
            "(none)".to_string()
        } else {
            value.to_string()
        }
    };
    console.line("");
    console.line(format!("  Storage:         {}", config.storage_path.display()));
    console.line(format!("  Welcome message: {}", config.welcome_message));
    console.line(format!("  Mode:            {}", config.requested_mode()));
    console.line(format!("  NAT address:     {}", or_none(&config.nat_address)));
    if config.payment_enabled {
        console.line(format!("  RPC endpoint:    {}", or_none(&config.rpc_endpoint)));
    }
}

fn parse_mode(answer: &str) -> Option<NodeMode> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(NodeMode::Payment),
        "" | "n" | "no" => Some(NodeMode::Minimal),
        _ => None,
    }
}

fn parse_confirm(answer: &str) -> Option<bool> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use sm_app::usecases::{SetupContext, StartupOrchestrator};
    use sm_core::ports::{ChainProbePort, NodeServicePort, ProbeError, RunningNodePort};
    use sm_core::{ChainId, IdentityAddress, NetworkProfile, NodeStartDescriptor, SecretString};
    use sm_infra::FilePreferencesStore;

    use crate::adapters::console::test_support::buffered_console;
    use crate::adapters::TerminalEvents;

    struct FakeNode;

    #[async_trait]
    impl RunningNodePort for FakeNode {
        fn effective_mode(&self) -> NodeMode {
            NodeMode::Minimal
        }

        fn identity_address(&self) -> IdentityAddress {
            IdentityAddress::new("0x1111222233334444555566667777888899990000")
        }

        async fn connected_peers(&self) -> anyhow::Result<usize> {
            Ok(0)
        }

        async fn chequebook_balance(&self) -> anyhow::Result<String> {
            Ok("0".to_string())
        }

        async fn shutdown(&self) -> anyhow::Result<()> {
            Ok(())
        }
    }

    struct FakeNodeService;

    #[async_trait]
    impl NodeServicePort for FakeNodeService {
        async fn start_node(
            &self,
            _descriptor: &NodeStartDescriptor,
            _password: &SecretString,
        ) -> anyhow::Result<Arc<dyn RunningNodePort>> {
            Ok(Arc::new(FakeNode))
        }

        async fn recover_identity_address(
            &self,
            _storage_path: &Path,
            _password: &SecretString,
        ) -> anyhow::Result<IdentityAddress> {
            anyhow::bail!("not used")
        }
    }

    struct NoProber;

    #[async_trait]
    impl ChainProbePort for NoProber {
        async fn probe(&self, _endpoint: &str) -> Result<ChainId, ProbeError> {
            Err(ProbeError::Unreachable("offline".to_string()))
        }
    }

    fn wizard(dir: &TempDir, events: Arc<TerminalEvents>) -> Arc<SetupOrchestrator> {
        let prefs = Arc::new(FilePreferencesStore::new(dir.path().join("preferences.json")));
        let startup = Arc::new(StartupOrchestrator::new(
            Arc::new(FakeNodeService),
            prefs,
            events.clone(),
            NetworkProfile::mainnet(),
            Duration::from_secs(5),
        ));
        Arc::new(SetupOrchestrator::new(
            SetupContext::starting_with(NodeConfig::new(dir.path().join("node"))).arc(),
            Arc::new(NoProber),
            Duration::from_secs(5),
            startup,
            events,
        ))
    }

    #[test]
    fn answers_are_parsed_leniently() {
        assert_eq!(parse_mode(" Y "), Some(NodeMode::Payment));
        assert_eq!(parse_mode(""), Some(NodeMode::Minimal));
        assert_eq!(parse_mode("maybe"), None);
        assert_eq!(parse_confirm(""), Some(true));
        assert_eq!(parse_confirm("NO"), Some(false));
        assert_eq!(parse_confirm("later"), None);
    }

    #[tokio::test]
    async fn minimal_run_reaches_a_running_node() {
        let dir = TempDir::new().unwrap();
        let (console, buffer) = buffered_console();
        let wizard = wizard(&dir, Arc::new(TerminalEvents::new(console.clone())));
        let mut prompter = Prompter::new(&b"Secr3t!\n\nmaybe\nn\n\ny\n"[..], console);

        let outcome = drive_wizard(wizard.clone(), &mut prompter).await.unwrap();

        assert!(matches!(outcome, Some(StartupOutcome::Running(_))));
        let text = buffer.text();
        assert!(text.contains("Please answer y or n."));
        assert!(text.contains("Mode:            minimal"));
        assert!(text.contains("NAT address:     (none)"));
        assert!(text.contains("Node running in minimal mode"));
    }

    #[tokio::test]
    async fn back_reopens_the_previous_step_and_eof_stops() {
        let dir = TempDir::new().unwrap();
        let (console, _buffer) = buffered_console();
        let wizard = wizard(&dir, Arc::new(TerminalEvents::new(console.clone())));
        let mut prompter = Prompter::new(&b"first\n:back\nsecond\n"[..], console);

        let outcome = drive_wizard(wizard.clone(), &mut prompter).await.unwrap();

        assert!(outcome.is_none());
        assert_eq!(wizard.get_state().await, SetupState::WelcomeMessage);
        assert_eq!(wizard.config_snapshot().await.password.expose(), "second");
    }
}
