//! Reading and writing the saved configuration.

use std::sync::Arc;

use tracing::{debug, info_span};

use sm_core::config::keys;
use sm_core::ports::{PreferenceValue, PreferencesPort};
use sm_core::{NodeConfig, SavedConfig, SecretString};

#[derive(Debug, thiserror::Error)]
pub enum PersistConfigError {
    #[error("failed to write settings: {0}")]
    Write(#[source] anyhow::Error),

    #[error("failed to read settings back: {0}")]
    ReadBack(#[source] anyhow::Error),

    #[error("settings read back differ from what was written (key {key})")]
    Mismatch { key: &'static str },
}

/// Loads the five configuration keys.
pub struct LoadSavedConfig {
    preferences: Arc<dyn PreferencesPort>,
}

impl LoadSavedConfig {
    pub fn new(preferences: Arc<dyn PreferencesPort>) -> Self {
        Self { preferences }
    }

    pub fn execute(&self) -> anyhow::Result<SavedConfig> {
        let _span = info_span!("usecase.load_saved_config.execute").entered();
        let prefs = &self.preferences;
        let saved = SavedConfig {
            password: SecretString::new(prefs.get_string(keys::PASSWORD)?),
            welcome_message: prefs.get_string(keys::WELCOME_MESSAGE)?,
            payment_enabled: prefs.get_bool(keys::PAYMENT_ENABLED)?,
            nat_address: prefs.get_string(keys::NAT_ADDRESS)?,
            rpc_endpoint: prefs.get_string(keys::RPC_ENDPOINT)?,
        };
        debug!(
            complete = saved.is_complete(),
            payment_enabled = saved.payment_enabled,
            "loaded saved configuration"
        );
        Ok(saved)
    }
}

/// Writes the configuration as one commit and verifies it by reading it back.
pub struct PersistConfig {
    preferences: Arc<dyn PreferencesPort>,
}

impl PersistConfig {
    pub fn new(preferences: Arc<dyn PreferencesPort>) -> Self {
        Self { preferences }
    }

    pub fn execute(&self, config: &NodeConfig) -> Result<(), PersistConfigError> {
        let _span = info_span!("usecase.persist_config.execute").entered();

        let batch = [
            (
                keys::PASSWORD,
                PreferenceValue::String(config.password.expose().to_string()),
            ),
            (
                keys::WELCOME_MESSAGE,
                PreferenceValue::String(config.welcome_message.clone()),
            ),
            (
                keys::PAYMENT_ENABLED,
                PreferenceValue::Bool(config.payment_enabled),
            ),
            (
                keys::NAT_ADDRESS,
                PreferenceValue::String(config.nat_address.clone()),
            ),
            (
                keys::RPC_ENDPOINT,
                PreferenceValue::String(config.rpc_endpoint.clone()),
            ),
        ];
        self.preferences
            .commit(&batch)
            .map_err(PersistConfigError::Write)?;

        let stored = LoadSavedConfig::new(self.preferences.clone())
            .execute()
            .map_err(PersistConfigError::ReadBack)?;
        let expected = SavedConfig::from_node_config(config);
        if let Some(key) = first_difference(&expected, &stored) {
            return Err(PersistConfigError::Mismatch { key });
        }

        debug!("configuration persisted and verified");
        Ok(())
    }
}

fn first_difference(expected: &SavedConfig, stored: &SavedConfig) -> Option<&'static str> {
    if expected.password != stored.password {
        Some(keys::PASSWORD)
    } else if expected.welcome_message != stored.welcome_message {
        Some(keys::WELCOME_MESSAGE)
    } else if expected.payment_enabled != stored.payment_enabled {
        Some(keys::PAYMENT_ENABLED)
    } else if expected.nat_address != stored.nat_address {
        Some(keys::NAT_ADDRESS)
    } else if expected.rpc_endpoint != stored.rpc_endpoint {
        Some(keys::RPC_ENDPOINT)
    } else {
        None
    }
}
