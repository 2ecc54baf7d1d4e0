//! The chat boundary: one free-text message in, one composed reply out.
//!
//! Endpoints:
//! - `POST /chat` - run one support turn `{ "message": "..." }` ->
//!   `{ "reply": "...", "correlation_id": "..." }`
//!
//! Turns are serialized through an async mutex: each message runs the whole
//! router to completion before the next is accepted. The assistant is a
//! one-user-at-a-time interactive surface, and the sequential contract is
//! part of its tested behavior.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use clerky_agent::runtime::AgentRuntime;
use clerky_core::errors::InterfaceError;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

#[derive(Clone)]
pub struct ChatState {
    runtime: Arc<AgentRuntime>,
    turn_gate: Arc<Mutex<()>>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    pub correlation_id: String,
}

#[derive(Debug, Serialize)]
pub struct ChatError {
    pub error: String,
    pub correlation_id: String,
}

pub fn router(runtime: Arc<AgentRuntime>) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .with_state(ChatState { runtime, turn_gate: Arc::new(Mutex::new(())) })
}

pub async fn chat(
    State(state): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ChatError>)> {
    let correlation_id = Uuid::new_v4().to_string();

    if request.message.trim().is_empty() {
        let error = InterfaceError::BadRequest {
            message: "message must not be empty".to_string(),
            correlation_id: correlation_id.clone(),
        };
        return Err(into_response(error, correlation_id));
    }

    // One turn at a time: hold the gate for the full router run.
    let _turn = state.turn_gate.lock().await;

    match state.runtime.handle_message(request.message.trim()).await {
        Ok(reply) => Ok(Json(ChatResponse { reply, correlation_id })),
        Err(error) => {
            warn!(
                event_name = "server.chat.turn_failed",
                correlation_id = %correlation_id,
                error = %error,
                "turn aborted"
            );
            let interface = error.into_interface(correlation_id.clone());
            Err(into_response(interface, correlation_id))
        }
    }
}

fn into_response(
    error: InterfaceError,
    correlation_id: String,
) -> (StatusCode, Json<ChatError>) {
    let status = match &error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ChatError { error: error.user_message().to_string(), correlation_id }))
}
