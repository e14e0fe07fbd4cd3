mod secrets;

pub use secrets::{sanitize_api_key, ChatConfig, Secrets};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{defaults, endpoints, paths};
use crate::error::ChatError;
use crate::llm::GeminiClient;
use crate::session::FailurePolicy;

/// Non-secret settings, read from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub llm: LlmSettings,
    #[serde(default)]
    pub chat: ChatSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    /// Per-request timeout. Unset means wait for the remote service.
    pub timeout_secs: Option<u64>,
    pub models_page_size: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// What happens to the user message when the remote call fails.
    pub on_failure: FailurePolicy,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            title: defaults::TITLE.to_string(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: endpoints::GEMINI_BASE_URL.to_string(),
            timeout_secs: None,
            models_page_size: defaults::MODELS_PAGE_SIZE,
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    /// Load from the default location, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load() -> Self {
        let config_path = Self::config_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(settings) => return settings,
                Err(e) => tracing::warn!("Ignoring {}: {}", config_path.display(), e),
            }
        }
        Self::default()
    }

    /// Load from an explicit path. Unlike `load`, errors are returned.
    pub fn load_from(path: &Path) -> Result<Self, ChatError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ChatError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ChatError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ChatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build a Gemini client from the resolved secrets and these settings.
    /// The model is not verified here; see `GeminiClient::resolve_model`.
    pub fn build_client(&self, config: &ChatConfig) -> Result<GeminiClient, ChatError> {
        let client = GeminiClient::new(config.api_key.clone())
            .with_model(config.model.clone())
            .with_base_url(self.llm.base_url.clone())
            .with_page_size(self.llm.models_page_size);

        match self.llm.timeout_secs {
            Some(secs) => client.with_timeout(Duration::from_secs(secs)),
            None => Ok(client),
        }
    }
}
