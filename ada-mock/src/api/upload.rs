//! Whole-file upload analysis endpoint

use ada_common::api::types::UploadAnalysisResponse;
use ada_common::time;
use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::synthesis::{draw_processing_time, synthesize_upload};
use crate::AppState;

/// Mode reported when the form omits one
pub const DEFAULT_UPLOAD_MODE: &str = "hybrid";

/// Name and size of the uploaded file part
#[derive(Debug)]
struct ReceivedFile {
    file_name: String,
    size: u64,
}

/// POST /analyze/upload/hybrid
///
/// Multipart fields: `file` (binary, read fully then discarded) and optional
/// `mode`. A `file` part without a filename is not a file upload and counts
/// as missing; an empty `mode` falls back to the default. Waits for `min(processing_time, upload_delay_cap)` on the tokio
/// timer before answering, so other requests keep flowing meanwhile.
pub async fn analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadAnalysisResponse>> {
    let mut file: Option<ReceivedFile> = None;
    let mut mode: Option<String> = None;

    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let Some(file_name) = field.file_name().map(str::to_string) else {
                    debug!("Ignoring file part without a filename");
                    continue;
                };
                let mut size = 0u64;
                while let Some(piece) = field.chunk().await? {
                    size += piece.len() as u64;
                }
                file = Some(ReceivedFile { file_name, size });
            }
            "mode" => mode = Some(field.text().await?),
            other => debug!(field = other, "Ignoring unexpected multipart field"),
        }
    }

    let file = file.ok_or(ApiError::MissingField("file"))?;
    let mode = mode
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_UPLOAD_MODE.to_string());

    let rng = state.rng.as_ref();
    let processing_time = draw_processing_time(rng);
    let delay = time::secs_f64_to_duration(processing_time).min(state.upload_delay_cap);
    tokio::time::sleep(delay).await;

    let verdict = synthesize_upload(rng);
    info!(
        file_name = %file.file_name,
        file_size = file.size,
        mode = %mode,
        verdict = %verdict.scores.verdict,
        delay_ms = delay.as_millis() as u64,
        "Analyzed upload"
    );

    Ok(Json(UploadAnalysisResponse {
        final_verdict: verdict.scores.verdict,
        is_authentic: verdict.scores.is_authentic,
        confidence: verdict.scores.confidence,
        risk_score: verdict.scores.risk_score,
        processing_time,
        liveness_result: verdict.liveness,
        deepfake_result: verdict.deepfake,
        voice_result: verdict.voice,
        reasons: verdict.reasons,
        mode,
        file_name: Some(file.file_name),
        file_size: file.size,
    }))
}

/// Build upload analysis routes
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/analyze/upload/hybrid", post(analyze_upload))
}
