use std::fmt;
use std::ops::Deref;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// A sensitive string that must never be logged or serialized.
///
/// - Debug / Display render `[REDACTED]`
/// - equality is constant-time
/// - the buffer is zeroed on drop
pub struct SecretString {
    inner: String,
}

impl SecretString {
    /// Create a new SecretString.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// An empty secret, used for fields that have not been collected yet.
    pub fn empty() -> Self {
        Self::new(String::new())
    }

    /// Borrow the inner secret as &str.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Consume and return the inner String.
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.inner)
    }

    /// Explicit copy for the few places that must hand the secret to another owner
    /// (persisting it, passing it to the node process).
    pub fn duplicate(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl Default for SecretString {
    fn default() -> Self {
        Self::empty()
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.inner.as_bytes().ct_eq(other.inner.as_bytes()).into()
    }
}

impl Eq for SecretString {}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl Deref for SecretString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.expose()
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}
