//! Verdict synthesis
//!
//! Produces randomized but internally consistent analysis results. No media
//! is inspected. The order of draws from the [`RandomSource`] is fixed so a
//! scripted source can pin exact outputs:
//!
//! - chunk: authenticity, confidence, risk, then (only when not authentic)
//!   the voice-clone coin
//! - upload: authenticity, confidence, risk, liveness pass rate, challenges
//!   passed, frames analyzed, suspicious frames (only when not authentic),
//!   voice-clone coin (only when not authentic)

use ada_common::api::types::{
    ChunkAnalysisResponse, DeepfakeResult, DeepfakeScanResult, LivenessResult, VoiceResult,
    Verdict, TOTAL_LIVENESS_CHALLENGES,
};

use crate::random::RandomSource;

/// Share of the overall risk attributed to the deepfake detector
pub const DEEPFAKE_RISK_WEIGHT: f64 = 0.6;
/// Share of the overall risk attributed to the voice-clone detector
pub const VOICE_RISK_WEIGHT: f64 = 0.4;

/// Range of the simulated upload processing time, in seconds
pub const PROCESSING_TIME_RANGE: (f64, f64) = (2.0, 5.0);

/// Distribution parameters for one kind of analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreProfile {
    /// Result is authentic when a unit draw exceeds this
    pub authentic_threshold: f64,
    pub authentic_confidence: (f64, f64),
    pub suspect_confidence: (f64, f64),
    pub authentic_risk: (f64, f64),
    pub suspect_risk: (f64, f64),
}

/// Real-time chunks: 70% authentic
pub const REALTIME_PROFILE: ScoreProfile = ScoreProfile {
    authentic_threshold: 0.3,
    authentic_confidence: (0.75, 0.95),
    suspect_confidence: (0.60, 0.85),
    authentic_risk: (5.0, 25.0),
    suspect_risk: (40.0, 75.0),
};

/// Whole-file uploads: 60% authentic
pub const UPLOAD_PROFILE: ScoreProfile = ScoreProfile {
    authentic_threshold: 0.4,
    authentic_confidence: (0.75, 0.95),
    suspect_confidence: (0.65, 0.85),
    authentic_risk: (5.0, 25.0),
    suspect_risk: (45.0, 80.0),
};

/// Headline scores shared by both analysis kinds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoreScores {
    pub is_authentic: bool,
    pub confidence: f64,
    pub risk_score: f64,
    pub verdict: Verdict,
}

impl CoreScores {
    fn draw(profile: &ScoreProfile, rng: &dyn RandomSource) -> Self {
        let is_authentic = rng.exceeds(profile.authentic_threshold);
        let (conf_lo, conf_hi) = if is_authentic {
            profile.authentic_confidence
        } else {
            profile.suspect_confidence
        };
        let confidence = rng.uniform(conf_lo, conf_hi);
        let (risk_lo, risk_hi) = if is_authentic {
            profile.authentic_risk
        } else {
            profile.suspect_risk
        };
        let risk_score = rng.uniform(risk_lo, risk_hi);

        Self {
            is_authentic,
            confidence,
            risk_score,
            verdict: Verdict::classify(is_authentic, risk_score),
        }
    }

    fn voice_result(&self, rng: &dyn RandomSource) -> VoiceResult {
        VoiceResult {
            is_clone: !self.is_authentic && rng.exceeds(0.5),
            risk_score: self.risk_score * VOICE_RISK_WEIGHT,
            confidence: self.confidence,
        }
    }
}

/// Synthesized result for one real-time chunk
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkVerdict {
    pub scores: CoreScores,
    pub deepfake: DeepfakeResult,
    pub voice: VoiceResult,
}

impl ChunkVerdict {
    /// Attach the session id and wall-clock timestamp for the wire
    pub fn into_response(self, session_id: String, timestamp: String) -> ChunkAnalysisResponse {
        ChunkAnalysisResponse {
            session_id,
            final_verdict: self.scores.verdict,
            confidence: self.scores.confidence,
            risk_score: self.scores.risk_score,
            timestamp,
            deepfake_result: self.deepfake,
            voice_result: self.voice,
        }
    }
}

/// Synthesized result for a whole uploaded file
#[derive(Debug, Clone, PartialEq)]
pub struct UploadVerdict {
    pub scores: CoreScores,
    pub liveness: LivenessResult,
    pub deepfake: DeepfakeScanResult,
    pub voice: VoiceResult,
    pub reasons: Vec<String>,
}

pub fn synthesize_chunk(rng: &dyn RandomSource) -> ChunkVerdict {
    let scores = CoreScores::draw(&REALTIME_PROFILE, rng);
    let deepfake = DeepfakeResult {
        is_fake: !scores.is_authentic,
        risk_score: scores.risk_score * DEEPFAKE_RISK_WEIGHT,
        confidence: scores.confidence,
    };
    let voice = scores.voice_result(rng);

    ChunkVerdict {
        scores,
        deepfake,
        voice,
    }
}

pub fn synthesize_upload(rng: &dyn RandomSource) -> UploadVerdict {
    let scores = CoreScores::draw(&UPLOAD_PROFILE, rng);
    let authentic = scores.is_authentic;

    let liveness = LivenessResult {
        is_live: authentic,
        pass_rate: if authentic {
            rng.uniform(0.7, 0.95)
        } else {
            rng.uniform(0.3, 0.6)
        },
        challenges_passed: if authentic {
            rng.int_inclusive(4, 6)
        } else {
            rng.int_inclusive(1, 3)
        },
        total_challenges: TOTAL_LIVENESS_CHALLENGES,
    };

    let frames_analyzed = rng.int_inclusive(30, 120);
    let deepfake = DeepfakeScanResult {
        is_fake: !authentic,
        risk_score: scores.risk_score * DEEPFAKE_RISK_WEIGHT,
        frames_analyzed,
        suspicious_frames: if authentic {
            0
        } else {
            rng.int_inclusive(10, 50)
        },
    };

    let voice = scores.voice_result(rng);
    let reasons = reasons(authentic, scores.verdict);

    UploadVerdict {
        scores,
        liveness,
        deepfake,
        voice,
        reasons,
    }
}

/// Simulated processing time reported for an upload, in seconds
pub fn draw_processing_time(rng: &dyn RandomSource) -> f64 {
    rng.uniform(PROCESSING_TIME_RANGE.0, PROCESSING_TIME_RANGE.1)
}

/// Human-readable explanation lines for an upload verdict
pub fn reasons(is_authentic: bool, verdict: Verdict) -> Vec<String> {
    let (video, liveness, audio) = if is_authentic {
        (
            "Good",
            "Passed multiple challenges",
            "Natural voice patterns",
        )
    } else {
        (
            "Suspicious artifacts detected",
            "Failed liveness verification",
            "Synthetic indicators found",
        )
    };

    vec![
        format!("Video quality: {}", video),
        format!("Liveness: {}", liveness),
        format!("Audio: {}", audio),
        format!(
            "Overall risk assessment: {}",
            verdict.as_str().to_uppercase()
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedSource, ThreadRngSource};

    const EPS: f64 = 1e-9;

    #[test]
    fn test_chunk_authentic_branch() {
        // authentic draw, confidence midpoint, risk midpoint; no clone coin
        let rng = ScriptedSource::new([0.9, 0.5, 0.5]);
        let v = synthesize_chunk(&rng);

        assert!(v.scores.is_authentic);
        assert_eq!(v.scores.verdict, Verdict::Authentic);
        assert!((v.scores.confidence - 0.85).abs() < EPS);
        assert!((v.scores.risk_score - 15.0).abs() < EPS);
        assert!(!v.deepfake.is_fake);
        assert!(!v.voice.is_clone);
        assert!((v.deepfake.risk_score - 9.0).abs() < EPS);
        assert!((v.voice.risk_score - 6.0).abs() < EPS);
        assert_eq!(v.deepfake.confidence, v.scores.confidence);
        assert_eq!(v.voice.confidence, v.scores.confidence);
    }

    #[test]
    fn test_chunk_suspicious_branch() {
        // not authentic, risk 40 + 35 * 0.2 = 47, clone coin low
        let rng = ScriptedSource::new([0.1, 0.0, 0.2, 0.4]);
        let v = synthesize_chunk(&rng);

        assert!(!v.scores.is_authentic);
        assert_eq!(v.scores.verdict, Verdict::Suspicious);
        assert!((v.scores.confidence - 0.60).abs() < EPS);
        assert!((v.scores.risk_score - 47.0).abs() < EPS);
        assert!(v.deepfake.is_fake);
        assert!(!v.voice.is_clone);
    }

    #[test]
    fn test_chunk_synthetic_branch_with_clone() {
        // risk 40 + 35 * 0.8 = 68 → synthetic, clone coin high
        let rng = ScriptedSource::new([0.2, 0.5, 0.8, 0.9]);
        let v = synthesize_chunk(&rng);

        assert_eq!(v.scores.verdict, Verdict::Synthetic);
        assert!((v.scores.risk_score - 68.0).abs() < EPS);
        assert!(v.voice.is_clone);
        assert!((v.deepfake.risk_score - 40.8).abs() < EPS);
        assert!((v.voice.risk_score - 27.2).abs() < EPS);
    }

    #[test]
    fn test_chunk_threshold_boundary_is_not_authentic() {
        let rng = ScriptedSource::new([0.3, 0.0, 0.0, 0.0]);
        assert!(!synthesize_chunk(&rng).scores.is_authentic);
    }

    #[test]
    fn test_chunk_invariants_hold_for_random_draws() {
        let rng = ThreadRngSource;
        for _ in 0..2000 {
            let v = synthesize_chunk(&rng);
            let s = v.scores;
            assert_eq!(s.verdict, Verdict::classify(s.is_authentic, s.risk_score));
            assert!((v.deepfake.risk_score - s.risk_score * 0.6).abs() < EPS);
            assert!((v.voice.risk_score - s.risk_score * 0.4).abs() < EPS);
            assert_eq!(v.deepfake.is_fake, !s.is_authentic);
            if s.is_authentic {
                assert!((0.75..=0.95).contains(&s.confidence));
                assert!((5.0..=25.0).contains(&s.risk_score));
                assert!(!v.voice.is_clone);
            } else {
                assert!((0.60..=0.85).contains(&s.confidence));
                assert!((40.0..=75.0).contains(&s.risk_score));
            }
        }
    }

    #[test]
    fn test_upload_authentic_branch() {
        // authentic, confidence, risk, pass rate, challenges, frames
        let rng = ScriptedSource::new([0.5, 0.0, 0.0, 0.0, 0.999, 0.0]);
        let v = synthesize_upload(&rng);

        assert!(v.scores.is_authentic);
        assert_eq!(v.scores.verdict, Verdict::Authentic);
        assert!(v.liveness.is_live);
        assert!((v.liveness.pass_rate - 0.7).abs() < EPS);
        assert_eq!(v.liveness.challenges_passed, 6);
        assert_eq!(v.liveness.total_challenges, 6);
        assert_eq!(v.deepfake.frames_analyzed, 30);
        assert_eq!(v.deepfake.suspicious_frames, 0);
        assert!(!v.voice.is_clone);
        assert_eq!(
            v.reasons,
            vec![
                "Video quality: Good",
                "Liveness: Passed multiple challenges",
                "Audio: Natural voice patterns",
                "Overall risk assessment: AUTHENTIC",
            ]
        );
    }

    #[test]
    fn test_upload_synthetic_branch() {
        // not authentic, risk 45 + 35 * 0.9 = 76.5
        let rng = ScriptedSource::new([0.4, 0.5, 0.9, 0.5, 0.0, 0.999, 0.999, 0.7]);
        let v = synthesize_upload(&rng);

        assert!(!v.scores.is_authentic);
        assert!((v.scores.risk_score - 76.5).abs() < EPS);
        assert_eq!(v.scores.verdict, Verdict::Synthetic);
        assert!(!v.liveness.is_live);
        assert!((v.liveness.pass_rate - 0.45).abs() < EPS);
        assert_eq!(v.liveness.challenges_passed, 1);
        assert_eq!(v.deepfake.frames_analyzed, 120);
        assert_eq!(v.deepfake.suspicious_frames, 50);
        assert!(v.deepfake.is_fake);
        assert!(v.voice.is_clone);
        assert_eq!(v.reasons[0], "Video quality: Suspicious artifacts detected");
        assert_eq!(v.reasons[1], "Liveness: Failed liveness verification");
        assert_eq!(v.reasons[2], "Audio: Synthetic indicators found");
        assert_eq!(v.reasons[3], "Overall risk assessment: SYNTHETIC");
    }

    #[test]
    fn test_upload_suspicious_reason_label() {
        assert_eq!(
            reasons(false, Verdict::Suspicious)[3],
            "Overall risk assessment: SUSPICIOUS"
        );
    }

    #[test]
    fn test_upload_invariants_hold_for_random_draws() {
        let rng = ThreadRngSource;
        for _ in 0..2000 {
            let v = synthesize_upload(&rng);
            let s = v.scores;
            assert_eq!(s.verdict, Verdict::classify(s.is_authentic, s.risk_score));
            assert!((v.deepfake.risk_score - s.risk_score * 0.6).abs() < EPS);
            assert!((v.voice.risk_score - s.risk_score * 0.4).abs() < EPS);
            assert_eq!(v.reasons.len(), 4);
            assert!(v.liveness.challenges_passed <= v.liveness.total_challenges);
            if s.is_authentic {
                assert!((4..=6).contains(&v.liveness.challenges_passed));
                assert_eq!(v.deepfake.suspicious_frames, 0);
            } else {
                assert!((45.0..=80.0).contains(&s.risk_score));
                assert!((0.65..=0.85).contains(&s.confidence));
                assert!((1..=3).contains(&v.liveness.challenges_passed));
                assert!((10..=50).contains(&v.deepfake.suspicious_frames));
            }
        }
    }

    #[test]
    fn test_processing_time_range() {
        let rng = ScriptedSource::new([0.0, 0.5]);
        assert!((draw_processing_time(&rng) - 2.0).abs() < EPS);
        assert!((draw_processing_time(&rng) - 3.5).abs() < EPS);
    }
}
