//! Deployment configuration DTO.
//!
//! Pure data: TOML is mapped field by field, nothing is validated and no
//! default is computed here. A missing key is an empty fact (`""`, `0`).
//! Defaults are resolved by the caller.

use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// `[node] network`, e.g. `"mainnet"`
    pub network: String,
    /// `[node] bee_binary`
    pub bee_binary: PathBuf,
    /// `[node] api_url`
    pub node_api_url: String,
    /// `[node] data_dir`, overrides the platform storage location
    pub data_dir: PathBuf,
    /// `[timeouts] probe_secs`
    pub probe_timeout_secs: u64,
    /// `[timeouts] startup_secs`
    pub startup_timeout_secs: u64,
    /// `[timeouts] status_interval_secs`
    pub status_interval_secs: u64,
}

impl AppConfig {
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let str_at = |table: &str, key: &str| -> String {
            toml_value
                .get(table)
                .and_then(|t| t.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };
        let secs_at = |key: &str| -> u64 {
            toml_value
                .get("timeouts")
                .and_then(|t| t.get(key))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as u64
        };

        Ok(Self {
            network: str_at("node", "network"),
            bee_binary: PathBuf::from(str_at("node", "bee_binary")),
            node_api_url: str_at("node", "api_url"),
            data_dir: PathBuf::from(str_at("node", "data_dir")),
            probe_timeout_secs: secs_at("probe_secs"),
            startup_timeout_secs: secs_at("startup_secs"),
            status_interval_secs: secs_at("status_interval_secs"),
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toml::Value;

    #[test]
    fn missing_sections_are_empty_facts() {
        let value: Value = toml::from_str("").unwrap();
        let config = AppConfig::from_toml(&value).unwrap();
        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn parses_node_and_timeouts() {
        let value: Value = toml::from_str(
            r#"
            [node]
            network = "testnet"
            bee_binary = "/opt/bee/bin/bee"
            api_url = "http://127.0.0.1:1733"

            [timeouts]
            probe_secs = 3
            startup_secs = 60
            "#,
        )
        .unwrap();

        let config = AppConfig::from_toml(&value).unwrap();

        assert_eq!(config.network, "testnet");
        assert_eq!(config.bee_binary, PathBuf::from("/opt/bee/bin/bee"));
        assert_eq!(config.node_api_url, "http://127.0.0.1:1733");
        assert_eq!(config.probe_timeout_secs, 3);
        assert_eq!(config.startup_timeout_secs, 60);
        assert_eq!(config.status_interval_secs, 0);
    }

    #[test]
    fn negative_values_are_not_validated_but_clamped_to_zero() {
        let value: Value = toml::from_str("[timeouts]\nprobe_secs = -5").unwrap();
        let config = AppConfig::from_toml(&value).unwrap();
        assert_eq!(config.probe_timeout_secs, 0);
    }
}
