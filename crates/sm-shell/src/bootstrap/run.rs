//! Terminal main loop: resume or run the wizard, then serve until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use tracing::{info, info_span, warn, Instrument};

use sm_app::usecases::{NodeSession, NodeStatusSnapshot, ResumeOutcome, StartupOutcome};
use sm_core::config::AppConfig;
use sm_core::ports::RunningNodePort;
use sm_core::NodeMode;
use sm_platform::DirsAppDirsAdapter;

use super::runtime::AppRuntime;
use super::settings::RuntimeSettings;
use super::wiring::{resolve_app_paths, startup_settings, wire_dependencies};
use crate::adapters::prompt::wait_with_progress;
use crate::adapters::{drive_wizard, Console, Prompter, TerminalEvents};

const PROGRESS_TICK: Duration = Duration::from_secs(1);

/// What to do with the result of a start attempt.
enum Settled {
    Serve(NodeSession),
    /// Started in the wrong mode; kept alive but not used.
    Hold(Arc<dyn RunningNodePort>),
}

pub async fn run_app(config: AppConfig) -> anyhow::Result<()> {
    let settings = RuntimeSettings::resolve(&config);
    let paths = resolve_app_paths(&DirsAppDirsAdapter::new(), &settings)?;
    info!(
        network = settings.network.as_str(),
        storage = %paths.storage_path.display(),
        preferences = %paths.preferences_path.display(),
        "shell starting"
    );

    let console = Console::stdout();
    let events = Arc::new(TerminalEvents::new(console.clone()));
    let deps = wire_dependencies(&settings, &paths, events)?;
    let runtime = AppRuntime::new(deps, startup_settings(&settings, &paths));

    let resumed = {
        let resume = runtime.usecases().resume_from_saved_config();
        let task = tokio::spawn(async move { resume.execute().await });
        wait_with_progress(&console, "", PROGRESS_TICK, task).await?
    };

    let settled = match resumed {
        ResumeOutcome::Started(outcome) => settle(outcome, &console),
        ResumeOutcome::NeedsSetup => None,
    };

    let settled = match settled {
        Some(settled) => settled,
        None => {
            let mut prompter = Prompter::stdin(console.clone());
            let wizard = runtime.usecases().setup_wizard();
            let span = info_span!("shell.wizard");
            match drive_wizard(wizard, &mut prompter).instrument(span).await? {
                Some(outcome) => match settle(outcome, &console) {
                    Some(settled) => settled,
                    None => bail!("wizard finished without a running node"),
                },
                None => {
                    console.line("Setup cancelled.");
                    return Ok(());
                }
            }
        }
    };

    match settled {
        Settled::Serve(session) => serve(session, &console).await,
        Settled::Hold(node) => hold(node, &console).await,
    }
}

fn settle(outcome: StartupOutcome, console: &Console) -> Option<Settled> {
    match outcome {
        StartupOutcome::Running(session) => Some(Settled::Serve(session)),
        StartupOutcome::Unsaved { session, error } => {
            warn!(error = %error, "serving a node whose configuration was not saved");
            console.line(
                "warning: the configuration was not saved; setup will run again next time",
            );
            Some(Settled::Serve(session))
        }
        StartupOutcome::Inconsistent { node, .. } => Some(Settled::Hold(node)),
        StartupOutcome::Failed(error) => {
            info!(error = %error, "start failed, running setup");
            None
        }
    }
}

async fn serve(session: NodeSession, console: &Console) -> anyhow::Result<()> {
    console.line(format!(
        "Identity address {}. Press Ctrl-C to stop.",
        session.identity_address()
    ));
    let mode = session.mode();
    let mut status = session.subscribe();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            changed = status.changed() => {
                if changed.is_err() {
                    warn!("status updates stopped");
                    break;
                }
                let snapshot = status.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    console.line(format_status(&snapshot, mode));
                }
            }
        }
    }

    console.line("Stopping node ...");
    session.shutdown().await
}

async fn hold(node: Arc<dyn RunningNodePort>, console: &Console) -> anyhow::Result<()> {
    console.line("The node keeps running but will not be used. Press Ctrl-C to stop it.");
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
    }
    console.line("Stopping node ...");
    node.shutdown().await
}

fn format_status(snapshot: &NodeStatusSnapshot, mode: NodeMode) -> String {
    let at = snapshot
        .refreshed_at
        .with_timezone(&chrono::Local)
        .format("%H:%M:%S");
    match (&snapshot.chequebook_balance, mode) {
        (Some(balance), NodeMode::Payment) => format!(
            "[{at}] peers: {}, chequebook: {balance} PLUR",
            snapshot.connected_peers
        ),
        _ => format!("[{at}] peers: {}", snapshot.connected_peers),
    }
}
