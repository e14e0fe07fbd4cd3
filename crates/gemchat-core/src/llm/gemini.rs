use crate::constants::{defaults, endpoints, models};
use crate::error::ChatError;
use crate::llm::discovery::{
    alternate_model_name, generation_models, model_resource, ModelInfo, ModelsPage,
};
use crate::llm::traits::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Client for the Gemini REST API (`generativelanguage.googleapis.com`).
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    page_size: u32,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: models::DEFAULT_MODEL.to_string(),
            base_url: endpoints::GEMINI_BASE_URL.to_string(),
            page_size: defaults::MODELS_PAGE_SIZE,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Bound every request by `timeout`. Requests are unbounded otherwise.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ChatError> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, endpoints::API_VERSION, path)
    }

    /// Fetch metadata for a single model.
    pub async fn get_model(&self, name: &str) -> Result<ModelInfo, ChatError> {
        let url = self.api_url(&model_resource(name));
        let response = self
            .client
            .get(&url)
            .header(endpoints::API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        let body = read_body(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Verify the configured model exists. On failure, retry once under the
    /// alternate naming convention and keep whichever name worked. Both names
    /// address the same resource, so the retry covers transient failures.
    pub async fn resolve_model(mut self) -> Result<Self, ChatError> {
        let primary = self.get_model(&self.model).await;
        let first_error = match primary {
            Ok(info) => {
                info!(model = %self.model, display_name = %info.display_name, "Model resolved");
                return Ok(self);
            }
            Err(e) => e,
        };

        let fallback = alternate_model_name(&self.model);
        warn!(
            "Model '{}' failed to initialize ({}), trying '{}'",
            self.model, first_error, fallback
        );

        let secondary = self.get_model(&fallback).await;
        match secondary {
            Ok(info) => {
                info!(model = %fallback, display_name = %info.display_name, "Model resolved via fallback name");
                self.model = fallback;
                Ok(self)
            }
            Err(e) => Err(ChatError::ModelInit {
                model: self.model.clone(),
                fallback,
                source: Box::new(e),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

async fn read_body(response: reqwest::Response) -> Result<String, ChatError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(ChatError::api(status.as_u16(), api_error_message(&text)));
    }
    Ok(text)
}

fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Concatenated text of the first candidate, skipping thought parts.
fn extract_text(response: GenerateContentResponse) -> Result<String, ChatError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(ChatError::Blocked(reason));
    };

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|p| !p.thought)
        .filter_map(|p| p.text)
        .collect();

    if texts.is_empty() {
        return Err(ChatError::EmptyResponse(
            candidate
                .finish_reason
                .unwrap_or_else(|| "UNKNOWN".to_string()),
        ));
    }

    Ok(texts.concat())
}

#[async_trait::async_trait]
impl CompletionApi for GeminiClient {
    async fn generate(&self, contents: &[Content]) -> Result<String, ChatError> {
        let url = self.api_url(&format!("{}:generateContent", model_resource(&self.model)));
        debug!(model = %self.model, turns = contents.len(), "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header(endpoints::API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest { contents })
            .send()
            .await?;

        let body = read_body(response).await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        extract_text(parsed)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, ChatError> {
        let url = self.api_url("models");
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let mut request = self
                .client
                .get(&url)
                .header(endpoints::API_KEY_HEADER, &self.api_key)
                .query(&[("pageSize", self.page_size.to_string())]);
            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let body = read_body(request.send().await?).await?;
            let page: ModelsPage = serde_json::from_str(&body)?;
            models.extend(generation_models(page.models));

            let Some(token) = page.next_page_token.filter(|t| !t.is_empty()) else {
                break;
            };
            if !seen_tokens.insert(token.clone()) {
                warn!(token = %token, "Model listing repeated its page token, stopping");
                break;
            }
            page_token = Some(token);
        }

        Ok(models)
    }
}
