//! # Configuration Loader
//!
//! Reads the deployment TOML file into the `AppConfig` DTO.
//!
//! Pure data loading: no validation, no defaults. Whatever is in the file is
//! a fact; defaults are resolved later by [`RuntimeSettings`].
//!
//! [`RuntimeSettings`]: super::settings::RuntimeSettings

use std::path::PathBuf;

use anyhow::Context;
use sm_core::config::AppConfig;
use tracing::{info, warn};

const CONFIG_ENV: &str = "SM_CONFIG";
const CONFIG_DIR_NAME: &str = "swarm-mobile";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// `$SM_CONFIG`, else `<config_dir>/swarm-mobile/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)),
    }
}

/// Loads the deployment configuration, falling back to an empty one.
///
/// A missing file is normal; an unreadable or malformed one is logged.
pub fn load_config_or_default() -> AppConfig {
    let Some(path) = default_config_path() else {
        warn!("no configuration directory on this platform, using defaults");
        return AppConfig::empty();
    };
    load_config_from(path)
}

fn load_config_from(path: PathBuf) -> AppConfig {
    if !path.exists() {
        info!(path = %path.display(), "no configuration file, using defaults");
        return AppConfig::empty();
    }
    match load_config(path.clone()) {
        Ok(config) => {
            info!(path = %path.display(), "configuration loaded");
            config
        }
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %format!("{err:#}"),
                "configuration ignored, using defaults"
            );
            AppConfig::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [node]
            network = "testnet"
            bee_binary = "/opt/bee/bin/bee"
            api_url = "http://127.0.0.1:2633"

            [timeouts]
            probe_secs = 3
            startup_secs = 60
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path().to_path_buf()).unwrap();

        assert_eq!(config.network, "testnet");
        assert_eq!(config.bee_binary, Path::new("/opt/bee/bin/bee"));
        assert_eq!(config.node_api_url, "http://127.0.0.1:2633");
        assert_eq!(config.probe_timeout_secs, 3);
        assert_eq!(config.startup_timeout_secs, 60);
        assert_eq!(config.status_interval_secs, 0);
    }

    #[test]
    fn test_load_config_returns_io_error_on_file_not_found() {
        let result = load_config(PathBuf::from("/this/path/does/not/exist/config.toml"));

        let err_msg = result.unwrap_err().to_string().to_lowercase();
        assert!(err_msg.contains("failed to read"), "got: {err_msg}");
    }

    #[test]
    fn test_malformed_file_falls_back_to_empty_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[node\nnetwork = ").unwrap();

        assert!(load_config(temp_file.path().to_path_buf()).is_err());
        assert_eq!(
            load_config_from(temp_file.path().to_path_buf()),
            AppConfig::empty()
        );
    }

    #[test]
    fn test_missing_file_is_empty_config() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(
            load_config_from(dir.path().join("config.toml")),
            AppConfig::empty()
        );
    }
}
