//! Centralized constants.
//! Defaults, endpoints and secret names live here.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    /// Used when no model name is configured.
    pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

    /// Resource-name prefix of the alternate model naming convention.
    pub const MODEL_RESOURCE_PREFIX: &str = "models/";

    /// Generation method a model must advertise to be usable for chat.
    pub const GENERATE_CONTENT_METHOD: &str = "generateContent";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
    pub const API_VERSION: &str = "v1beta";
    pub const API_KEY_HEADER: &str = "x-goog-api-key";
}

// ─── Secrets ──────────────────────────────────────────────────────────────────

pub mod secrets {
    pub const API_KEY: &str = "GEMINI_API_KEY";
    pub const MODEL: &str = "GEMINI_MODEL";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const HOST: &str = "127.0.0.1";
    pub const PORT: u16 = 8501;
    pub const TITLE: &str = "Gemini Chat";
    pub const MODELS_PAGE_SIZE: u32 = 50;
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "gemchat";
    pub const CONFIG_FILE: &str = "config.toml";
    pub const SECRETS_DIR: &str = ".gemchat";
    pub const SECRETS_FILE: &str = "secrets.toml";
}
