use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use sm_core::ports::{PreferenceValue, PreferencesPort};

type Entries = Map<String, Value>;

/// Settings store backed by a single JSON object file.
///
/// The file is read once and cached. Every write rewrites the whole file
/// through a temp file + rename, so the file on disk is always either the old
/// or the new complete document.
pub struct FilePreferencesStore {
    path: PathBuf,
    cache: Mutex<Option<Entries>>,
}

impl FilePreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, Option<Entries>>> {
        self.cache
            .lock()
            .map_err(|_| anyhow!("preferences cache lock poisoned"))
    }

    /// Returns the cached entries, loading the file on first use.
    fn entries<'a>(&self, guard: &'a mut MutexGuard<'_, Option<Entries>>) -> Result<&'a Entries> {
        if guard.is_none() {
            **guard = Some(self.read_file()?);
        }
        guard
            .as_ref()
            .ok_or_else(|| anyhow!("preferences cache not loaded"))
    }

    fn read_file(&self) -> Result<Entries> {
        let content = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "preferences file not found, starting empty");
                return Ok(Entries::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("read preferences failed: {}", self.path.display()))
            }
        };

        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("parse preferences failed: {}", self.path.display()))?;
        match value {
            Value::Object(entries) => Ok(entries),
            other => Err(anyhow!(
                "preferences file {} holds {} instead of an object",
                self.path.display(),
                json_kind(&other)
            )),
        }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create preferences dir failed: {}", dir.display()))?;
        }
        Ok(())
    }

    fn atomic_write(&self, content: &str) -> Result<()> {
        self.ensure_parent_dir()?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("write temp preferences failed: {}", tmp_path.display()))?;
        restrict_permissions(&tmp_path)?;

        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "rename temp preferences to target failed: {} -> {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Applies `batch` to a copy of the entries, writes it, then swaps the cache.
    fn write_batch(&self, batch: &[(&str, PreferenceValue)]) -> Result<()> {
        let mut guard = self.lock()?;
        let mut next = self.entries(&mut guard)?.clone();
        for (key, value) in batch {
            let value = match value {
                PreferenceValue::String(s) => Value::String(s.clone()),
                PreferenceValue::Bool(b) => Value::Bool(*b),
            };
            next.insert((*key).to_string(), value);
        }

        let content = serde_json::to_string_pretty(&Value::Object(next.clone()))
            .context("serialize preferences failed")?;
        self.atomic_write(&content)?;
        *guard = Some(next);

        debug!(keys = batch.len(), path = %self.path.display(), "preferences written");
        Ok(())
    }

    fn get_value(&self, key: &str) -> Result<Option<Value>> {
        let mut guard = self.lock()?;
        Ok(self.entries(&mut guard)?.get(key).cloned())
    }
}

impl PreferencesPort for FilePreferencesStore {
    fn get_string(&self, key: &str) -> Result<String> {
        match self.get_value(key)? {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s),
            Some(other) => {
                warn!(
                    key,
                    found = json_kind(&other),
                    "preference is not a string, treating as absent"
                );
                Ok(String::new())
            }
        }
    }

    fn get_bool(&self, key: &str) -> Result<bool> {
        match self.get_value(key)? {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(b),
            Some(other) => {
                warn!(
                    key,
                    found = json_kind(&other),
                    "preference is not a bool, treating as absent"
                );
                Ok(false)
            }
        }
    }

    fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.write_batch(&[(key, PreferenceValue::String(value.to_string()))])
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.write_batch(&[(key, PreferenceValue::Bool(value))])
    }

    /// One file rewrite for the whole batch.
    fn commit(&self, batch: &[(&str, PreferenceValue)]) -> Result<()> {
        self.write_batch(batch)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The file holds the node password.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("restrict preferences permissions failed: {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}
