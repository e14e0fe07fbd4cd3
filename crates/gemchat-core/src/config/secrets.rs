use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::constants::{models, paths, secrets};
use crate::error::ChatError;

/// Flat key/value secret store: a TOML file of string entries, backed by the
/// process environment.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    values: HashMap<String, String>,
    use_env: bool,
}

impl Secrets {
    pub fn default_path() -> PathBuf {
        PathBuf::from(paths::SECRETS_DIR).join(paths::SECRETS_FILE)
    }

    /// Read `path` (a missing file counts as empty) with environment fallback.
    pub fn load(path: &Path) -> Result<Self, ChatError> {
        let mut values = HashMap::new();

        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let table: toml::Table = toml::from_str(&content)
                .map_err(|e| ChatError::Config(format!("{}: {}", path.display(), e)))?;

            for (key, value) in table {
                match value.as_str() {
                    Some(s) => {
                        values.insert(key, s.to_string());
                    }
                    None => tracing::warn!("Secret '{}' is not a string, ignoring", key),
                }
            }
        }

        Ok(Self {
            values,
            use_env: true,
        })
    }

    /// In-memory store with no environment fallback.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            use_env: false,
        }
    }

    /// Look up `key`; empty values count as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match self.values.get(key) {
            Some(v) => Some(v.clone()),
            None if self.use_env => std::env::var(key).ok(),
            None => None,
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// Everything the chat needs from the secret store, resolved once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct ChatConfig {
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl ChatConfig {
    pub fn resolve(secrets: &Secrets) -> Result<Self, ChatError> {
        let api_key = secrets
            .get(secrets::API_KEY)
            .map(|k| sanitize_api_key(&k))
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                ChatError::Config(format!(
                    "{key} not found. Add it to {file} or set the {key} environment variable.",
                    key = secrets::API_KEY,
                    file = Secrets::default_path().display(),
                ))
            })?;

        let model = secrets
            .get(secrets::MODEL)
            .map(|m| m.trim().to_string())
            .unwrap_or_else(|| models::DEFAULT_MODEL.to_string());

        Ok(Self { api_key, model })
    }
}

/// Strip surrounding whitespace and any stray line breaks pasted into the key.
pub fn sanitize_api_key(raw: &str) -> String {
    raw.trim().replace(['\r', '\n'], "")
}
