//! REST endpoints for driving the coach from a browser.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use super::sessions::CoachSessions;

/// Shared state for coach routes.
#[derive(Clone)]
pub struct CoachRouteState {
    pub sessions: Arc<CoachSessions>,
}

/// Build the coach REST routes.
pub fn coach_routes(sessions: Arc<CoachSessions>) -> Router {
    let state = CoachRouteState { sessions };

    Router::new()
        .route("/health", get(health))
        .route("/api/coach/checklist", get(get_checklist))
        .route("/api/coach/sessions", post(create_session))
        .route(
            "/api/coach/sessions/{id}",
            get(get_session).delete(delete_session),
        )
        .route("/api/coach/sessions/{id}/messages", post(send_message))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "just-in-case-coach"
    }))
}

fn invalid_id() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({"error": "Invalid session ID"})),
    )
}

fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({"error": "Session not found"})),
    )
}

/// GET /api/coach/checklist
async fn get_checklist(State(state): State<CoachRouteState>) -> impl IntoResponse {
    Json(serde_json::json!(state.sessions.checklist()))
}

/// POST /api/coach/sessions
///
/// Starts a new session and returns the greeting events.
async fn create_session(State(state): State<CoachRouteState>) -> impl IntoResponse {
    let (id, events, status) = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "id": id,
            "events": events,
            "status": status,
        })),
    )
}

/// GET /api/coach/sessions/{id}
async fn get_session(
    State(state): State<CoachRouteState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return invalid_id();
    };
    match state.sessions.status(id).await {
        Some(status) => (StatusCode::OK, Json(serde_json::json!(status))),
        None => not_found(),
    }
}

/// DELETE /api/coach/sessions/{id}
async fn delete_session(
    State(state): State<CoachRouteState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return invalid_id();
    };
    if state.sessions.remove(id).await {
        (
            StatusCode::OK,
            Json(serde_json::json!({"status": "deleted"})),
        )
    } else {
        not_found()
    }
}

#[derive(Deserialize)]
struct MessageRequest {
    text: String,
}

/// POST /api/coach/sessions/{id}/messages
///
/// Forwards the text into the session and returns what the coach rendered.
async fn send_message(
    State(state): State<CoachRouteState>,
    Path(id): Path<String>,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Ok(id) = Uuid::parse_str(&id) else {
        return invalid_id();
    };
    let body = match payload {
        Ok(Json(body)) => body,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({"error": format!("Invalid message body: {e}")})),
            );
        }
    };
    match state.sessions.send(id, &body.text).await {
        Some((events, status)) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "events": events,
                "status": status,
            })),
        ),
        None => not_found(),
    }
}
