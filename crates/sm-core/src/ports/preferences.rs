/// A primitive settings value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceValue {
    String(String),
    Bool(bool),
}

/// Durable key/value store of primitive settings.
///
/// Reads of absent keys yield `""` / `false`.
pub trait PreferencesPort: Send + Sync {
    fn get_string(&self, key: &str) -> anyhow::Result<String>;

    fn get_bool(&self, key: &str) -> anyhow::Result<bool>;

    fn set_string(&self, key: &str, value: &str) -> anyhow::Result<()>;

    fn set_bool(&self, key: &str, value: bool) -> anyhow::Result<()>;

    /// Write several keys as one logical unit.
    ///
    /// The default writes them in order; stores that can do better override it.
    fn commit(&self, batch: &[(&str, PreferenceValue)]) -> anyhow::Result<()> {
        for (key, value) in batch {
            match value {
                PreferenceValue::String(value) => self.set_string(key, value)?,
                PreferenceValue::Bool(value) => self.set_bool(key, *value)?,
            }
        }
        Ok(())
    }
}
