pub mod error;
pub mod llm;
pub mod context;
pub mod config;
pub mod constants;
pub mod session;

// Re-export key types
pub use error::ChatError;
pub use llm::{CompletionApi, Content, GeminiClient, Message, ModelInfo, Part, Role, WireRole};
pub use context::ConversationHistory;
pub use config::{ChatConfig, Secrets, Settings};
pub use session::{ChatOutcome, ChatSession, FailurePolicy};
