//! ada-mock library - ADA Media Integrity mock analysis service
//!
//! Serves randomized but structurally realistic authenticity verdicts so the
//! mobile UI can be developed and tested without the real analysis backend.

pub mod api;
pub mod error;
pub mod random;
pub mod session;
pub mod synthesis;

pub use crate::error::{ApiError, ApiResult};

use ada_common::config::ServiceConfig;
use ada_common::time;
use axum::{extract::DefaultBodyLimit, Router};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::random::SharedRandom;
use crate::session::SessionStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active real-time sessions
    pub sessions: SessionStore,
    /// Draws for verdict synthesis
    pub rng: SharedRandom,
    /// Longest artificial delay applied to an upload
    pub upload_delay_cap: Duration,
    /// Request body limit for uploads and chunks
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(rng: SharedRandom, upload_delay_cap: Duration, max_upload_bytes: usize) -> Self {
        Self {
            sessions: SessionStore::new(),
            rng,
            upload_delay_cap,
            max_upload_bytes,
            startup_time: time::now(),
        }
    }

    /// Build state from resolved configuration
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            random::from_seed(config.seed),
            config.upload_delay_cap(),
            config.max_upload_bytes,
        )
    }
}

/// Build application router
///
/// All routes are public; CORS is fully open because the UI is served from
/// a different origin.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .merge(api::health_routes())
        .merge(api::realtime_routes())
        .merge(api::upload_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
