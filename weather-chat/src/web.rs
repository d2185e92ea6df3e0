//! The chat page and its JSON endpoints.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::{info, warn};
use weather_core::{ChatError, Conversation, Role};

const INDEX_HTML: &str = include_str!("index.html");

/// The one session this server talks for. The mutex serializes turns.
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Conversation>>,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub content: String,
}

pub fn build_router(conversation: Conversation) -> Router {
    let state = AppState { session: Arc::new(Mutex::new(conversation)) };

    Router::new()
        .route("/", get(index))
        .route("/api/messages", get(messages))
        .route("/api/chat", post(chat))
        .route("/api/reset", post(reset))
        .with_state(state)
}

pub async fn serve(addr: &str, conversation: Conversation) -> anyhow::Result<()> {
    let listener =
        TcpListener::bind(addr).await.with_context(|| format!("Failed to bind {addr}"))?;
    info!("Weather chat listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(conversation))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("Web server failed")
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn messages(State(state): State<AppState>) -> Json<Vec<TranscriptEntry>> {
    let session = state.session.lock().await;
    let entries = session
        .messages()
        .iter()
        .filter(|m| m.is_visible())
        .map(|m| TranscriptEntry { role: m.role, content: m.content.clone() })
        .collect();
    Json(entries)
}

async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ErrorBody>)> {
    let Json(body) = payload.map_err(|rejection| {
        warn!("Rejected chat request: {rejection}");
        let error = format!("Invalid chat request: {}", rejection.body_text());
        (StatusCode::BAD_REQUEST, Json(ErrorBody { error }))
    })?;

    let mut session = state.session.lock().await;

    match session.send(&body.message).await {
        Ok(reply) => Ok(Json(ChatReply { reply })),
        Err(e) => {
            let status = match e {
                ChatError::EmptyMessage => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            };
            warn!(status = %status, "Chat turn failed: {e}");
            Err((status, Json(ErrorBody { error: e.user_message() })))
        }
    }
}

async fn reset(State(state): State<AppState>) -> StatusCode {
    state.session.lock().await.clear();
    StatusCode::NO_CONTENT
}
