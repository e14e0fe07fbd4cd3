use crate::error::ChatError;
use crate::llm::discovery::ModelInfo;
use serde::{Deserialize, Serialize};

/// Author of a stored message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// The role tag Gemini expects for this author.
    pub fn wire_role(&self) -> WireRole {
        match self {
            Role::User => WireRole::User,
            Role::Assistant => WireRole::Model,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WireRole {
    User,
    Model,
}

/// One turn of a `generateContent` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    pub role: WireRole,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::text(WireRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::text(WireRole::Model, text)
    }

    fn text(role: WireRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

impl From<&Message> for Content {
    fn from(message: &Message) -> Self {
        Self::text(message.role.wire_role(), message.content.clone())
    }
}

/// The remote completion boundary. `GeminiClient` is the production
/// implementation; tests substitute scripted ones.
#[async_trait::async_trait]
pub trait CompletionApi: Send + Sync {
    /// Submit the ordered turns and return the text of the first candidate.
    async fn generate(&self, contents: &[Content]) -> Result<String, ChatError>;

    /// List models that support content generation.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ChatError>;
}
