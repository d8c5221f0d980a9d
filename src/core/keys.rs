//! Credential lookup.
//!
//! The client never stores or validates credentials itself. It asks a
//! [`KeyStore`] for a key by name once, at construction time.

use std::collections::HashMap;
use std::path::Path;

use super::error::LlmError;

/// Narrow lookup contract for API credentials.
pub trait KeyStore: Send + Sync {
    /// Returns the key stored under `name`, or [`LlmError::MissingKey`].
    fn get_key(&self, name: &str) -> Result<String, LlmError>;

    fn has_key(&self, name: &str) -> bool {
        self.get_key(name).is_ok()
    }
}

/// Reads keys from the process environment. Empty variables count as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvKeyStore;

impl KeyStore for EnvKeyStore {
    fn get_key(&self, name: &str) -> Result<String, LlmError> {
        lookup_env(name).ok_or_else(|| LlmError::MissingKey {
            name: name.to_string(),
        })
    }
}

/// In-memory key store.
#[derive(Clone, Default)]
pub struct StaticKeyStore {
    keys: HashMap<String, String>,
}

impl StaticKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.keys.insert(name.into(), value.into());
        self
    }
}

impl<K, V> FromIterator<(K, V)> for StaticKeyStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            keys: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl KeyStore for StaticKeyStore {
    fn get_key(&self, name: &str) -> Result<String, LlmError> {
        self.keys
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
            .ok_or_else(|| LlmError::MissingKey {
                name: name.to_string(),
            })
    }
}

// Values are secrets, only names are printed.
impl std::fmt::Debug for StaticKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticKeyStore")
            .field("keys", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Keys from a flat JSON object file (e.g. `keys.json`), falling back to the
/// environment for names the file does not define.
#[derive(Clone)]
pub struct FileKeyStore {
    keys: HashMap<String, String>,
}

impl FileKeyStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LlmError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LlmError::ProviderConfiguration(format!(
                "Failed to read key file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, LlmError> {
        let raw: HashMap<String, serde_json::Value> =
            serde_json::from_str(contents).map_err(|e| LlmError::Parse {
                message: "Key file must be a JSON object".to_string(),
                source: Box::new(e),
            })?;

        // Non-string entries are ignored rather than rejected.
        let keys = raw
            .into_iter()
            .filter_map(|(name, value)| match value {
                serde_json::Value::String(s) => Some((name, s)),
                _ => None,
            })
            .collect();

        Ok(Self { keys })
    }
}

impl KeyStore for FileKeyStore {
    fn get_key(&self, name: &str) -> Result<String, LlmError> {
        self.keys
            .get(name)
            .filter(|value| !value.is_empty())
            .cloned()
            .or_else(|| lookup_env(name))
            .ok_or_else(|| LlmError::MissingKey {
                name: name.to_string(),
            })
    }
}

impl std::fmt::Debug for FileKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKeyStore")
            .field("keys", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn lookup_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
