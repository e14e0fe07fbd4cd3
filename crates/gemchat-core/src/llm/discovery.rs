use crate::constants::models::{GENERATE_CONTENT_METHOD, MODEL_RESOURCE_PREFIX};
use serde::{Deserialize, Serialize};

/// Info about a model advertised by the Gemini `models` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    /// Resource name, e.g. `models/gemini-2.5-flash`.
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub input_token_limit: Option<u32>,
    #[serde(default)]
    pub output_token_limit: Option<u32>,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn supports_generation(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == GENERATE_CONTENT_METHOD)
    }

    /// Model id without the `models/` resource prefix.
    pub fn short_name(&self) -> &str {
        self.name
            .strip_prefix(MODEL_RESOURCE_PREFIX)
            .unwrap_or(&self.name)
    }
}

/// One page of `GET /v1beta/models`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ModelsPage {
    #[serde(default)]
    pub models: Vec<ModelInfo>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Keep only models usable for chat.
pub(crate) fn generation_models(models: Vec<ModelInfo>) -> Vec<ModelInfo> {
    models.into_iter().filter(ModelInfo::supports_generation).collect()
}

/// The same model under the other naming convention: toggles the
/// `models/` resource prefix.
pub fn alternate_model_name(name: &str) -> String {
    match name.strip_prefix(MODEL_RESOURCE_PREFIX) {
        Some(bare) => bare.to_string(),
        None => format!("{MODEL_RESOURCE_PREFIX}{name}"),
    }
}

/// REST resource path for a model given under either naming convention:
/// `gemini-x` and `models/gemini-x` both become `models/gemini-x`.
pub fn model_resource(name: &str) -> String {
    let bare = name.strip_prefix(MODEL_RESOURCE_PREFIX).unwrap_or(name);
    format!("{MODEL_RESOURCE_PREFIX}{bare}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(name: &str, methods: &[&str]) -> ModelInfo {
        ModelInfo {
            name: name.to_string(),
            display_name: String::new(),
            input_token_limit: None,
            output_token_limit: None,
            supported_generation_methods: methods.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn alternate_name_toggles_prefix() {
        assert_eq!(alternate_model_name("gemini-2.5-flash"), "models/gemini-2.5-flash");
        assert_eq!(alternate_model_name("models/gemini-2.5-flash"), "gemini-2.5-flash");
    }

    #[test]
    fn resource_path_is_the_same_for_both_conventions() {
        assert_eq!(model_resource("gemini-2.5-flash"), "models/gemini-2.5-flash");
        assert_eq!(model_resource("models/gemini-2.5-flash"), "models/gemini-2.5-flash");
    }

    #[test]
    fn filters_out_embedding_only_models() {
        let models = vec![
            model("models/gemini-2.5-flash", &["generateContent", "countTokens"]),
            model("models/text-embedding-004", &["embedContent"]),
        ];
        let kept = generation_models(models);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].short_name(), "gemini-2.5-flash");
    }
}
