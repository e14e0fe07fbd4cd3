use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use gemchat_core::{ChatOutcome, CompletionApi, Message, ModelInfo};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::page;
use crate::state::{AppState, Mode};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/config", get(config))
        .route("/api/models", get(list_models))
        .route(
            "/api/sessions/:id/messages",
            get(get_messages).post(send_message),
        )
        .route("/api/sessions/:id/clear", post(clear_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Chat UI listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
struct SubmitResponse {
    #[serde(flatten)]
    outcome: ChatOutcome,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct MessagesResponse {
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct ConfigResponse {
    title: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// JSON error reply: `{"error": "..."}` with the given status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

/// The completion API and model name, or 503 when configuration failed.
fn ready(state: &AppState) -> Result<(Arc<dyn CompletionApi>, String), ApiError> {
    match state.mode() {
        Mode::Ready { api, model } => Ok((api.clone(), model.clone())),
        Mode::Halted { reason } => Err(ApiError::new(StatusCode::SERVICE_UNAVAILABLE, reason.clone())),
    }
}

fn session_id(raw: &str) -> Result<String, ApiError> {
    uuid::Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| ApiError::new(StatusCode::BAD_REQUEST, "session id must be a UUID"))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(match state.mode() {
        Mode::Ready { model, .. } => page::render_chat(state.title(), model),
        Mode::Halted { reason } => page::render_halted(state.title(), reason),
    })
}

async fn config(State(state): State<AppState>) -> Result<Json<ConfigResponse>, ApiError> {
    let (_, model) = ready(&state)?;
    Ok(Json(ConfigResponse {
        title: state.title().to_string(),
        model,
    }))
}

async fn list_models(State(state): State<AppState>) -> Result<Json<ModelsResponse>, ApiError> {
    let (api, _) = ready(&state)?;
    let models = api.list_models().await.map_err(|e| {
        warn!("Model listing failed: {}", e);
        ApiError::new(StatusCode::BAD_GATEWAY, e.to_string())
    })?;
    Ok(Json(ModelsResponse { models }))
}

async fn get_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessagesResponse>, ApiError> {
    ready(&state)?;
    let id = session_id(&id)?;

    let handle = state.sessions().get_or_create(&id).await;
    let session = handle.lock().await;
    Ok(Json(MessagesResponse {
        messages: session.messages().to_vec(),
    }))
}

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let (api, _) = ready(&state)?;
    let id = session_id(&id)?;
    let Json(request) = request.map_err(|e| ApiError::new(e.status(), e.body_text()))?;
    if request.prompt.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "prompt is empty"));
    }

    let handle = state.sessions().get_or_create(&id).await;
    let mut session = handle.lock().await;
    let outcome = session.submit(api.as_ref(), &request.prompt).await;
    info!(
        session = %id,
        history = session.messages().len(),
        tokens = session.history().estimate_tokens(),
        answered = outcome.is_answered(),
        "Submission finished"
    );
    let status = if outcome.is_answered() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    let body = SubmitResponse {
        outcome,
        messages: session.messages().to_vec(),
    };
    Ok((status, Json(body)).into_response())
}

async fn clear_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ready(&state)?;
    let id = session_id(&id)?;

    let handle = state.sessions().get_or_create(&id).await;
    handle.lock().await.reset();
    info!(session = %id, "Chat cleared");
    Ok(StatusCode::NO_CONTENT)
}
