use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::context::ConversationHistory;
use crate::llm::{build_contents, CompletionApi, Message};

/// What to do with the already-recorded user message when the remote call
/// fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Keep the unanswered user message in the conversation.
    #[default]
    Retain,
    /// Remove it, leaving the conversation as it was before the submission.
    Rollback,
}

/// Result of one submission cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChatOutcome {
    Answered { text: String },
    Failed { reason: String },
}

impl ChatOutcome {
    pub fn is_answered(&self) -> bool {
        matches!(self, ChatOutcome::Answered { .. })
    }
}

/// One user's conversation plus the policy used when a call fails.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    history: ConversationHistory,
    policy: FailurePolicy,
}

impl ChatSession {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            history: ConversationHistory::new(),
            policy,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn messages(&self) -> &[Message] {
        self.history.all()
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    /// Record `prompt`, ask the model with the prior history, and record the
    /// reply. A failed call never records an assistant message.
    pub async fn submit(&mut self, api: &dyn CompletionApi, prompt: &str) -> ChatOutcome {
        let contents = build_contents(self.history.all(), prompt);
        self.history.add_user_message(prompt);

        match api.generate(&contents).await {
            Ok(text) => {
                self.history.add_assistant_message(text.clone());
                info!(turns = self.history.len(), "Model answered");
                ChatOutcome::Answered { text }
            }
            Err(e) => {
                if self.policy == FailurePolicy::Rollback {
                    self.history.pop_last();
                }
                warn!(policy = ?self.policy, "Model call failed: {}", e);
                ChatOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
