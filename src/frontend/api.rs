use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::ServerState;
use crate::conversation::{Message, SessionHandle, SessionId};
use crate::error::Error;

#[derive(Serialize)]
struct SessionView {
    id: SessionId,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct SubmitBody {
    content: String,
}

#[derive(Serialize)]
struct ReplyView {
    reply: String,
}

enum ApiError {
    NotFound(SessionId),
    BadRequest(&'static str),
    Full,
    Backend(Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(id) => (StatusCode::NOT_FOUND, format!("no session {id}")),
            ApiError::BadRequest(why) => (StatusCode::BAD_REQUEST, why.to_string()),
            ApiError::Full => (
                StatusCode::SERVICE_UNAVAILABLE,
                "too many open sessions".to_string(),
            ),
            ApiError::Backend(err) => (StatusCode::BAD_GATEWAY, err.user_message()),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub(super) fn routes() -> Router<Arc<ServerState>> {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(show_session).delete(close_session))
        .route("/api/sessions/:id/messages", post(submit_message))
}

fn lookup(state: &ServerState, id: SessionId) -> Result<SessionHandle, ApiError> {
    state.registry.get(&id).ok_or(ApiError::NotFound(id))
}

async fn create_session(
    State(state): State<Arc<ServerState>>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let session = state.registry.open().ok_or(ApiError::Full)?;
    let view = SessionView {
        id: session.id(),
        messages: session.display_transcript(),
    };
    Ok((StatusCode::CREATED, Json(view)))
}

async fn show_session(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionView>, ApiError> {
    let session = lookup(&state, id)?;
    Ok(Json(SessionView {
        id,
        messages: session.display_transcript(),
    }))
}

async fn submit_message(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<SessionId>,
    Json(body): Json<SubmitBody>,
) -> Result<Json<ReplyView>, ApiError> {
    if body.content.trim().is_empty() {
        return Err(ApiError::BadRequest("content must not be blank"));
    }
    let session = lookup(&state, id)?;
    let reply = session.submit(&body.content).await.map_err(|err| {
        warn!(session = %id, error = %err, "turn failed");
        ApiError::Backend(err)
    })?;
    Ok(Json(ReplyView { reply }))
}

async fn close_session(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<SessionId>,
) -> Result<StatusCode, ApiError> {
    if state.registry.close(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(id))
    }
}
