//! Tracing subscriber for the shell.
//!
//! Registry with an env filter, a stdout layer, a non-blocking file layer in
//! `<app data>/logs/swarm-mobile.log` and, when `SENTRY_DSN` is set, a Sentry
//! layer. Guards are kept in statics for the life of the process.

use std::{fs, io, sync::OnceLock};

use sm_app::app_paths::AppPaths;
use sm_core::ports::AppDirsPort;
use sm_platform::app_dirs::DirsAppDirsAdapter;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{fmt, fmt::writer::BoxMakeWriter, prelude::*, registry};

const LOG_FILE_NAME: &str = "swarm-mobile.log";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static SENTRY_GUARD: OnceLock<sentry::ClientInitGuard> = OnceLock::new();

fn is_development() -> bool {
    cfg!(debug_assertions)
}

/// Default directives; `RUST_LOG` replaces them entirely.
fn build_filter_directives(is_dev: bool) -> Vec<String> {
    vec![
        if is_dev { "debug" } else { "info" }.to_string(),
        "hyper=warn".to_string(),
        "hyper_util=warn".to_string(),
        "reqwest=warn".to_string(),
        "rustls=warn".to_string(),
        // Node output is chatty at verbosity 4.
        if is_dev { "bee=debug" } else { "bee=info" }.to_string(),
    ]
}

/// Install the global subscriber. Call once, before anything logs.
///
/// # Errors
///
/// Returns `Err` if a global subscriber is already registered.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let is_dev = is_development();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(build_filter_directives(is_dev).join(","))
    });

    let sentry_layer = match std::env::var("SENTRY_DSN") {
        Ok(dsn) if !dsn.is_empty() => {
            let guard = sentry::init((
                dsn,
                sentry::ClientOptions {
                    release: sentry::release_name!(),
                    traces_sample_rate: 1.0,
                    ..Default::default()
                },
            ));
            if SENTRY_GUARD.set(guard).is_err() {
                eprintln!("Sentry guard already initialized");
            }
            Some(sentry_tracing::layer())
        }
        _ => None,
    };

    let file_writer = match build_file_writer() {
        Ok(writer) => Some(writer),
        Err(err) => {
            eprintln!("Failed to initialize file logging, logging to stdout only: {err}");
            None
        }
    };

    // The terminal is shared with the wizard prompts, so stdout only gets
    // warnings unless RUST_LOG asks for more.
    let stdout_filter = match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::filter::LevelFilter::TRACE,
        Err(_) => tracing_subscriber::filter::LevelFilter::WARN,
    };
    let stdout_layer = fmt::layer()
        .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
        .with_level(true)
        .with_target(true)
        .with_ansi(cfg!(not(test)))
        .with_writer(BoxMakeWriter::new(io::stdout))
        .with_filter(stdout_filter);

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_timer(fmt::time::ChronoUtc::new(TIMESTAMP_FORMAT.to_string()))
            .with_level(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_ansi(false)
            .with_writer(writer)
    });

    registry()
        .with(env_filter)
        .with(sentry_layer)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

fn build_file_writer() -> anyhow::Result<NonBlocking> {
    let app_dirs = DirsAppDirsAdapter::new().get_app_dirs()?;
    let paths = AppPaths::from_app_dirs(&app_dirs);
    fs::create_dir_all(&paths.logs_dir)?;

    let file_appender = tracing_appender::rolling::never(&paths.logs_dir, LOG_FILE_NAME);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    LOG_GUARD
        .set(guard)
        .map_err(|_| anyhow::anyhow!("Tracing log guard already initialized"))?;

    Ok(non_blocking)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_directives() {
        let dev = build_filter_directives(true);
        assert_eq!(dev[0], "debug");
        assert!(dev.contains(&"reqwest=warn".to_string()));
        assert!(dev.contains(&"bee=debug".to_string()));

        let prod = build_filter_directives(false);
        assert_eq!(prod[0], "info");
        assert!(prod.contains(&"hyper=warn".to_string()));
        assert!(prod.contains(&"bee=info".to_string()));
    }

    #[test]
    fn test_directives_parse_as_env_filter() {
        let joined = build_filter_directives(false).join(",");
        assert!(tracing_subscriber::EnvFilter::try_new(joined).is_ok());
    }
}
