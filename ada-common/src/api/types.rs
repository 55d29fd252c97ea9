//! Shared API request/response types
//!
//! Field names here are consumed verbatim by the mobile client; renaming a
//! field is a breaking change for it.

use serde::{Deserialize, Serialize};

/// Risk score at or above which a non-authentic result is labelled synthetic
pub const SYNTHETIC_RISK_THRESHOLD: f64 = 60.0;

/// Number of liveness challenges presented per upload
pub const TOTAL_LIVENESS_CHALLENGES: u32 = 6;

// ========================================
// Health
// ========================================

/// Response for `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Sessions started but not yet stopped or swept
    pub active_sessions: usize,
}

// ========================================
// Real-time sessions
// ========================================

/// Session lifecycle status reported by start/stop
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Started,
    Stopped,
    NotFound,
}

/// Request body for `POST /analyze/realtime/start`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeStartRequest {
    /// Sensitivity/speed tradeoff label
    #[serde(default = "default_realtime_mode")]
    pub mode: String,
    /// Media composition label
    #[serde(default = "default_stream_type")]
    pub stream_type: String,
}

impl Default for RealtimeStartRequest {
    fn default() -> Self {
        Self {
            mode: default_realtime_mode(),
            stream_type: default_stream_type(),
        }
    }
}

fn default_realtime_mode() -> String {
    "realtime_balanced".to_string()
}

fn default_stream_type() -> String {
    "video_audio".to_string()
}

/// Response for `POST /analyze/realtime/start`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeStartResponse {
    pub session_id: String,
    pub status: SessionStatus,
    pub mode: String,
    pub stream_type: String,
}

/// Request body for `POST /analyze/realtime/stop`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeStopRequest {
    pub session_id: String,
}

/// Response for `POST /analyze/realtime/stop`
///
/// `duration` and `frames_processed` are only present when the session
/// existed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RealtimeStopResponse {
    pub session_id: String,
    pub status: SessionStatus,
    /// Seconds between start and stop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames_processed: Option<u64>,
}

// ========================================
// Verdicts and sub-results
// ========================================

/// Categorical authenticity label
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Authentic,
    Suspicious,
    Synthetic,
}

impl Verdict {
    /// Label a result from its authenticity flag and risk score
    pub fn classify(is_authentic: bool, risk_score: f64) -> Self {
        if is_authentic {
            Verdict::Authentic
        } else if risk_score < SYNTHETIC_RISK_THRESHOLD {
            Verdict::Suspicious
        } else {
            Verdict::Synthetic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Authentic => "authentic",
            Verdict::Suspicious => "suspicious",
            Verdict::Synthetic => "synthetic",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-chunk deepfake detector output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeepfakeResult {
    pub is_fake: bool,
    pub risk_score: f64,
    pub confidence: f64,
}

/// Whole-file deepfake detector output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeepfakeScanResult {
    pub is_fake: bool,
    pub risk_score: f64,
    pub frames_analyzed: u32,
    pub suspicious_frames: u32,
}

/// Voice-clone detector output
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceResult {
    pub is_clone: bool,
    pub risk_score: f64,
    pub confidence: f64,
}

/// Liveness challenge outcome
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LivenessResult {
    pub is_live: bool,
    pub pass_rate: f64,
    pub challenges_passed: u32,
    pub total_challenges: u32,
}

// ========================================
// Analysis responses
// ========================================

/// Response for `POST /analyze/realtime/chunk`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChunkAnalysisResponse {
    pub session_id: String,
    pub final_verdict: Verdict,
    pub confidence: f64,
    pub risk_score: f64,
    /// Wall-clock `HH:MM:SS`
    pub timestamp: String,
    pub deepfake_result: DeepfakeResult,
    pub voice_result: VoiceResult,
}

/// Response for `POST /analyze/upload/hybrid`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadAnalysisResponse {
    pub final_verdict: Verdict,
    pub is_authentic: bool,
    pub confidence: f64,
    pub risk_score: f64,
    /// Simulated processing time in seconds (may exceed the actual delay)
    pub processing_time: f64,
    pub liveness_result: LivenessResult,
    pub deepfake_result: DeepfakeScanResult,
    pub voice_result: VoiceResult,
    pub reasons: Vec<String>,
    pub mode: String,
    pub file_name: Option<String>,
    pub file_size: u64,
}

// ========================================
// Error Response Types
// ========================================

/// Client error body, `{"detail": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdict_classification() {
        assert_eq!(Verdict::classify(true, 90.0), Verdict::Authentic);
        assert_eq!(Verdict::classify(false, 59.99), Verdict::Suspicious);
        assert_eq!(Verdict::classify(false, 60.0), Verdict::Synthetic);
        assert_eq!(Verdict::classify(false, 75.0), Verdict::Synthetic);
    }

    #[test]
    fn test_verdict_wire_names() {
        assert_eq!(serde_json::to_value(Verdict::Suspicious).unwrap(), json!("suspicious"));
        assert_eq!(Verdict::Synthetic.to_string(), "synthetic");
    }

    #[test]
    fn test_start_request_defaults() {
        let req: RealtimeStartRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req, RealtimeStartRequest::default());
        assert_eq!(req.mode, "realtime_balanced");
        assert_eq!(req.stream_type, "video_audio");

        let req: RealtimeStartRequest =
            serde_json::from_value(json!({"mode": "realtime_fast"})).unwrap();
        assert_eq!(req.mode, "realtime_fast");
        assert_eq!(req.stream_type, "video_audio");
    }

    #[test]
    fn test_stop_response_omits_counters_when_not_found() {
        let resp = RealtimeStopResponse {
            session_id: "abc".to_string(),
            status: SessionStatus::NotFound,
            duration: None,
            frames_processed: None,
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"session_id": "abc", "status": "not_found"})
        );
    }
}
