use std::collections::HashMap;
use std::sync::Arc;

use gemchat_core::{ChatSession, CompletionApi, FailurePolicy};
use tokio::sync::Mutex;

pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Chat sessions keyed by the browser-generated session id.
///
/// Sessions are created on first access and live until the process exits.
/// Each one has its own lock so a slow model call only blocks its own tab.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SharedSession>>,
    policy: FailurePolicy,
}

impl SessionRegistry {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            policy,
        }
    }

    pub async fn get_or_create(&self, id: &str) -> SharedSession {
        let mut sessions = self.sessions.lock().await;
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::info!(session = %id, "New chat session");
                Arc::new(Mutex::new(ChatSession::new(self.policy)))
            })
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

/// Whether the server can chat at all.
pub enum Mode {
    Ready {
        api: Arc<dyn CompletionApi>,
        model: String,
    },
    /// Configuration failed at startup; only the reason is shown.
    Halted { reason: String },
}

struct Inner {
    title: String,
    mode: Mode,
    sessions: SessionRegistry,
}

#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    pub fn ready(
        title: impl Into<String>,
        model: impl Into<String>,
        api: Arc<dyn CompletionApi>,
        policy: FailurePolicy,
    ) -> Self {
        Self::with_mode(
            title,
            Mode::Ready {
                api,
                model: model.into(),
            },
            policy,
        )
    }

    pub fn halted(title: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::with_mode(
            title,
            Mode::Halted {
                reason: reason.into(),
            },
            FailurePolicy::default(),
        )
    }

    fn with_mode(title: impl Into<String>, mode: Mode, policy: FailurePolicy) -> Self {
        Self {
            inner: Arc::new(Inner {
                title: title.into(),
                mode,
                sessions: SessionRegistry::new(policy),
            }),
        }
    }

    pub fn title(&self) -> &str {
        &self.inner.title
    }

    pub fn mode(&self) -> &Mode {
        &self.inner.mode
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.inner.sessions
    }
}
