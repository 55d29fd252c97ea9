//! Real-time analysis session table
//!
//! One [`SessionStore`] is created per server and cloned into every handler
//! through application state. Each operation that checks for a session and
//! then changes it does both under a single write lock.

use ada_common::uuid_utils;
use chrono::{DateTime, Utc};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

/// One active real-time stream
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub mode: String,
    pub stream_type: String,
    /// Wall-clock creation time
    pub started_at: DateTime<Utc>,
    /// Chunks processed so far
    pub frame_count: u64,
    started: Instant,
    last_activity: Instant,
}

impl Session {
    fn new(id: String, mode: String, stream_type: String) -> Self {
        let now = Instant::now();
        Self {
            id,
            mode,
            stream_type,
            started_at: Utc::now(),
            frame_count: 0,
            started: now,
            last_activity: now,
        }
    }

    /// Time since the session was started
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time since the last start or chunk
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_activity)
    }
}

/// The referenced session is not in the table
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Session not found: {0}")]
pub struct SessionNotFound(pub String);

/// Final counters of a session removed by stop
#[derive(Debug, Clone, PartialEq)]
pub struct StoppedSession {
    pub session_id: String,
    pub duration: Duration,
    pub frames_processed: u64,
}

/// Shared, lock-guarded map of session id to [`Session`]
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a fresh UUIDv4 identifier
    pub async fn start(&self, mode: String, stream_type: String) -> Session {
        let mut sessions = self.sessions.write().await;
        loop {
            let id = uuid_utils::generate_string();
            if let Entry::Vacant(slot) = sessions.entry(id.clone()) {
                let session = slot.insert(Session::new(id, mode, stream_type)).clone();
                info!(
                    session_id = %session.id,
                    mode = %session.mode,
                    stream_type = %session.stream_type,
                    "Started realtime session"
                );
                return session;
            }
        }
    }

    /// Count one processed chunk, returning the new frame count
    pub async fn record_chunk(&self, session_id: &str) -> Result<u64, SessionNotFound> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionNotFound(session_id.to_string()))?;

        session.frame_count += 1;
        session.last_activity = Instant::now();
        debug!(
            session_id = %session_id,
            frame_count = session.frame_count,
            "Recorded chunk"
        );
        Ok(session.frame_count)
    }

    /// Remove a session, returning its final counters if it existed
    pub async fn stop(&self, session_id: &str) -> Option<StoppedSession> {
        let session = self.sessions.write().await.remove(session_id)?;
        let stopped = StoppedSession {
            session_id: session.id.clone(),
            duration: session.elapsed(),
            frames_processed: session.frame_count,
        };
        info!(
            session_id = %stopped.session_id,
            frames = stopped.frames_processed,
            duration_secs = stopped.duration.as_secs_f64(),
            "Stopped realtime session"
        );
        Some(stopped)
    }

    /// Snapshot of one session
    pub async fn get(&self, session_id: &str) -> Option<Session> {
        self.sessions.read().await.get(session_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Remove sessions idle for longer than `ttl`, returning how many
    pub async fn sweep_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.idle_for(now) <= ttl);
        before - sessions.len()
    }
}

/// Periodically sweep idle sessions until the runtime shuts down
pub fn spawn_sweeper(store: SessionStore, ttl: Duration, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let swept = store.sweep_idle(ttl).await;
            if swept > 0 {
                info!(swept, ttl_secs = ttl.as_secs(), "Swept idle realtime sessions");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    async fn started(store: &SessionStore) -> String {
        store
            .start("realtime_balanced".to_string(), "video_audio".to_string())
            .await
            .id
    }

    #[tokio::test]
    async fn test_start_inserts_fresh_session() {
        let store = SessionStore::new();
        let session = store
            .start("realtime_fast".to_string(), "audio".to_string())
            .await;

        assert!(!session.id.is_empty());
        assert_eq!(session.frame_count, 0);
        assert_eq!(session.mode, "realtime_fast");
        assert_eq!(session.stream_type, "audio");
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(&session.id).await.unwrap().frame_count, 0);
    }

    #[tokio::test]
    async fn test_ten_thousand_ids_are_unique() {
        let store = SessionStore::new();
        let mut ids = HashSet::new();
        for _ in 0..10_000 {
            ids.insert(started(&store).await);
        }
        assert_eq!(ids.len(), 10_000);
        assert_eq!(store.len().await, 10_000);
    }

    #[tokio::test]
    async fn test_record_chunk_counts_up() {
        let store = SessionStore::new();
        let id = started(&store).await;

        for expected in 1..=5 {
            assert_eq!(store.record_chunk(&id).await, Ok(expected));
        }
        assert_eq!(store.get(&id).await.unwrap().frame_count, 5);
    }

    #[tokio::test]
    async fn test_record_chunk_unknown_leaves_table_alone() {
        let store = SessionStore::new();
        let id = started(&store).await;
        store.record_chunk(&id).await.unwrap();

        let err = store.record_chunk("missing").await.unwrap_err();
        assert_eq!(err, SessionNotFound("missing".to_string()));
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(&id).await.unwrap().frame_count, 1);
    }

    #[tokio::test]
    async fn test_stop_removes_and_reports_frames() {
        let store = SessionStore::new();
        let id = started(&store).await;
        for _ in 0..3 {
            store.record_chunk(&id).await.unwrap();
        }

        let stopped = store.stop(&id).await.expect("session should exist");
        assert_eq!(stopped.session_id, id);
        assert_eq!(stopped.frames_processed, 3);
        assert!(store.is_empty().await);

        assert!(store.record_chunk(&id).await.is_err());
        assert!(store.stop(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_stop_unknown_is_none() {
        let store = SessionStore::new();
        started(&store).await;
        assert!(store.stop("missing").await.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_idle_removes_only_stale_sessions() {
        let store = SessionStore::new();
        let stale = started(&store).await;
        let busy = started(&store).await;

        tokio::time::advance(Duration::from_secs(20)).await;
        store.record_chunk(&busy).await.unwrap();
        tokio::time::advance(Duration::from_secs(15)).await;

        assert_eq!(store.sweep_idle(Duration::from_secs(30)).await, 1);
        assert!(store.get(&stale).await.is_none());
        assert!(store.get(&busy).await.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_task_expires_sessions() {
        let store = SessionStore::new();
        let id = started(&store).await;
        let handle = spawn_sweeper(store.clone(), Duration::from_secs(30), Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(45)).await;

        assert!(store.get(&id).await.is_none());
        assert!(store.record_chunk(&id).await.is_err());
        handle.abort();
    }
}
