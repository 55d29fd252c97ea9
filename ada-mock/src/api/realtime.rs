//! Real-time analysis session endpoints
//!
//! - `POST /analyze/realtime/start` opens a session
//! - `POST /analyze/realtime/chunk` scores one streamed chunk
//! - `POST /analyze/realtime/stop` closes a session
//!
//! A chunk for an unknown session is a 404. Stopping an unknown session is a
//! normal response with status `not_found`; the mobile client relies on that
//! asymmetry.

use ada_common::api::types::{
    ChunkAnalysisResponse, RealtimeStartRequest, RealtimeStartResponse, RealtimeStopRequest,
    RealtimeStopResponse, SessionStatus,
};
use ada_common::time;
use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::synthesis::synthesize_chunk;
use crate::AppState;

/// POST /analyze/realtime/start
pub async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<RealtimeStartRequest>,
) -> Json<RealtimeStartResponse> {
    let session = state
        .sessions
        .start(request.mode, request.stream_type)
        .await;

    Json(RealtimeStartResponse {
        session_id: session.id,
        status: SessionStatus::Started,
        mode: session.mode,
        stream_type: session.stream_type,
    })
}

/// POST /analyze/realtime/chunk
///
/// Multipart fields: `chunk` (binary, discarded unread) and `session_id`.
/// An empty `session_id` counts as missing rather than as an unknown id.
pub async fn process_chunk(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ChunkAnalysisResponse>> {
    let mut chunk_bytes: Option<u64> = None;
    let mut session_id: Option<String> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "chunk" => {
                let mut received = 0u64;
                while let Some(piece) = field.chunk().await? {
                    received += piece.len() as u64;
                }
                chunk_bytes = Some(received);
            }
            "session_id" => session_id = Some(field.text().await?),
            other => debug!(field = other, "Ignoring unexpected multipart field"),
        }
    }

    let session_id = session_id
        .filter(|id| !id.is_empty())
        .ok_or(ApiError::MissingField("session_id"))?;
    let chunk_bytes = chunk_bytes.ok_or(ApiError::MissingField("chunk"))?;

    let frame = state.sessions.record_chunk(&session_id).await?;
    let verdict = synthesize_chunk(state.rng.as_ref());
    debug!(
        session_id = %session_id,
        frame,
        chunk_bytes,
        verdict = %verdict.scores.verdict,
        "Scored realtime chunk"
    );

    Ok(Json(verdict.into_response(session_id, time::clock_time())))
}

/// POST /analyze/realtime/stop
pub async fn stop_session(
    State(state): State<AppState>,
    Json(request): Json<RealtimeStopRequest>,
) -> Json<RealtimeStopResponse> {
    let response = match state.sessions.stop(&request.session_id).await {
        Some(stopped) => RealtimeStopResponse {
            session_id: stopped.session_id,
            status: SessionStatus::Stopped,
            duration: Some(stopped.duration.as_secs_f64()),
            frames_processed: Some(stopped.frames_processed),
        },
        None => {
            info!(session_id = %request.session_id, "Stop for unknown session");
            RealtimeStopResponse {
                session_id: request.session_id,
                status: SessionStatus::NotFound,
                duration: None,
                frames_processed: None,
            }
        }
    };

    Json(response)
}

/// Build real-time session routes
pub fn realtime_routes() -> Router<AppState> {
    Router::new()
        .route("/analyze/realtime/start", post(start_session))
        .route("/analyze/realtime/chunk", post(process_chunk))
        .route("/analyze/realtime/stop", post(stop_session))
}
