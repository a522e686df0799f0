use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before anything logs.
    if let Err(err) = sm_shell::bootstrap::tracing::init_tracing_subscriber() {
        eprintln!("Failed to initialize tracing: {err}");
    }

    let config = sm_shell::load_config_or_default();
    info!(version = env!("CARGO_PKG_VERSION"), "swarm-mobile starting");

    let result = sm_shell::run_app(config).await;
    if let Err(err) = &result {
        error!(error = %format!("{err:#}"), "swarm-mobile exited with an error");
    }
    result
}
