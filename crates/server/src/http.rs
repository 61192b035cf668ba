//! HTTP endpoints
//!
//! REST surface of the assistant. One response shape
//! (`AgentResponse`) for both the text and audio query endpoints.

use std::path::PathBuf;

use axum::{
    extract::{Multipart, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use telassist_core::UserQuery;

use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.settings.server.cors_origins);
    let static_dir = state.settings.server.static_dir.clone();

    Router::new()
        .route("/", get(service_info))
        .route("/api/v1/query/text", post(query_text))
        .route("/api/v1/query/audio", post(query_audio))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build the CORS layer from configured origins. An empty list means
/// a permissive layer, which only makes sense in development.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        tracing::warn!("No CORS origins configured, allowing all origins");
        return CorsLayer::permissive();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
}

#[derive(Debug, Deserialize)]
struct QueryParams {
    /// Synthesize the response text when true and voice is enabled.
    #[serde(default)]
    tts: bool,
}

/// POST /api/v1/query/text
async fn query_text(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
    Json(query): Json<UserQuery>,
) -> Result<impl IntoResponse, ServerError> {
    if query.user_id.trim().is_empty() {
        return Err(ServerError::BadRequest("user_id must not be empty".into()));
    }

    let text = query.text.unwrap_or_default();
    let mut response = state.orchestrator.handle_text(&query.user_id, &text).await;

    if params.tts {
        response = state.orchestrator.attach_voice(&query.user_id, response).await;
    }

    Ok(Json(response))
}

/// POST /api/v1/query/audio
///
/// Multipart form with a `user_id` field and an `audio_file` part. The
/// upload lands in a temp file that is removed once transcription is
/// done, whatever the outcome.
async fn query_audio(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ServerError> {
    let mut user_id: Option<String> = None;
    let mut audio: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::Upload(e.to_string()))?
    {
        match field.name() {
            Some("user_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ServerError::Upload(e.to_string()))?;
                user_id = Some(value);
            }
            Some("audio_file") => {
                let filename = field
                    .file_name()
                    .unwrap_or("audio.wav")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::Upload(e.to_string()))?;
                audio = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let user_id = user_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ServerError::BadRequest("user_id must not be empty".into()))?;
    let (filename, bytes) = audio
        .ok_or_else(|| ServerError::BadRequest("missing audio file part".into()))?;

    let temp_path = temp_upload_path(&state.settings.server.uploads_dir, &user_id, &filename);
    tokio::fs::write(&temp_path, &bytes)
        .await
        .map_err(|e| ServerError::Internal(format!("failed to store upload: {e}")))?;

    let response = state.orchestrator.handle_audio(&user_id, &temp_path).await;

    if let Err(e) = tokio::fs::remove_file(&temp_path).await {
        tracing::warn!(path = %temp_path.display(), error = %e, "Failed to remove upload");
    }

    let response = if params.tts {
        state.orchestrator.attach_voice(&user_id, response).await
    } else {
        response
    };
    Ok(Json(response))
}

fn temp_upload_path(uploads_dir: &str, user_id: &str, original_name: &str) -> PathBuf {
    // Only the extension of the client-supplied name is kept, and the
    // user id is reduced to filename-safe characters.
    let ext = std::path::Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("wav");
    let user: String = user_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    PathBuf::from(uploads_dir).join(format!(
        "upload_{}_{}.{}",
        user,
        uuid::Uuid::new_v4().simple(),
        ext
    ))
}

/// GET /
async fn service_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "telassist",
        "version": env!("CARGO_PKG_VERSION"),
        "procedures": state.catalog.len(),
        "voice_enabled": state.settings.voice.enabled,
    }))
}

/// GET /health
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// GET /ready
async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.catalog.is_empty() {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "no procedures loaded" })),
        );
    }
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ready",
            "procedures": state.catalog.len(),
        })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_upload_path_keeps_only_extension() {
        let path = temp_upload_path("temp_uploads", "u1", "../../etc/passwd.ogg");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("upload_u1_"));
        assert!(name.ends_with(".ogg"));
        assert_eq!(path.parent().unwrap(), std::path::Path::new("temp_uploads"));
    }

    #[test]
    fn test_temp_upload_path_sanitizes_user_id() {
        let path = temp_upload_path("temp_uploads", "../evil", "noext");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("upload_evil_"));
        assert!(name.ends_with(".wav"));
    }
}
