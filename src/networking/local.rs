//! In-process session service
//!
//! Keeps session records in memory and answers hint requests with the rule
//! engine. Backs the CLI and the tests. Two knobs simulate a real backend:
//!
//! - [`InMemorySessionService::set_offline`] makes every request fail with
//!   [`ServiceError::Unavailable`]
//! - [`InMemorySessionService::set_latency`] delays every response

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use super::service::{
    SessionConfig, SessionRecord, SessionService, ServiceError, ServiceResult,
};
use crate::game::rules::RuleEngine;
use crate::game::types::MoveRecord;

#[derive(Debug, Default)]
struct Store {
    sessions: HashMap<Uuid, SessionRecord>,
    /// Active session per user
    active: HashMap<String, Uuid>,
}

/// Session service holding everything in memory
pub struct InMemorySessionService {
    engine: Arc<dyn RuleEngine>,
    store: Mutex<Store>,
    offline: AtomicBool,
    latency: Mutex<Duration>,
}

impl InMemorySessionService {
    pub fn new(engine: Arc<dyn RuleEngine>) -> Self {
        Self {
            engine,
            store: Mutex::new(Store::default()),
            offline: AtomicBool::new(false),
            latency: Mutex::new(Duration::ZERO),
        }
    }

    /// Fail every request while `offline` is set
    pub fn set_offline(&self, offline: bool) {
        info!("[SESSION] Local service {}", if offline { "offline" } else { "online" });
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Delay every response by `latency`
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = latency;
    }

    /// Store `record` as the user's active session
    ///
    /// Lets tests seed sessions the client never created, including ones
    /// with corrupt move lists.
    pub fn insert_record(&self, record: SessionRecord) {
        let mut store = self.store.lock();
        store.active.insert(record.user_id.clone(), record.id);
        store.sessions.insert(record.id, record);
    }

    /// Current copy of a stored session
    pub fn record(&self, session_id: Uuid) -> Option<SessionRecord> {
        self.store.lock().sessions.get(&session_id).cloned()
    }

    pub fn session_count(&self) -> usize {
        self.store.lock().sessions.len()
    }

    async fn round_trip(&self) -> ServiceResult<()> {
        let latency = *self.latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(ServiceError::Unavailable(
                "local service is offline".to_string(),
            ));
        }
        Ok(())
    }

    fn remove(&self, session_id: Uuid) -> ServiceResult<SessionRecord> {
        let mut store = self.store.lock();
        let record = store
            .sessions
            .remove(&session_id)
            .ok_or(ServiceError::SessionNotFound(session_id))?;
        if store.active.get(&record.user_id) == Some(&session_id) {
            store.active.remove(&record.user_id);
        }
        Ok(record)
    }
}

#[async_trait]
impl SessionService for InMemorySessionService {
    async fn create_session(
        &self,
        user_id: &str,
        config: SessionConfig,
    ) -> ServiceResult<SessionRecord> {
        self.round_trip().await?;

        let record = SessionRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            config,
            starting_fen: self.engine.serialize(&self.engine.initial()),
            moves: Vec::new(),
            created_at: Utc::now(),
        };

        let mut store = self.store.lock();
        if let Some(previous) = store.active.insert(user_id.to_string(), record.id) {
            store.sessions.remove(&previous);
            debug!("[SESSION] Replaced session {} for {}", previous, user_id);
        }
        store.sessions.insert(record.id, record.clone());
        info!("[SESSION] Created session {} for {}", record.id, user_id);
        Ok(record)
    }

    async fn active_session(&self, user_id: &str) -> ServiceResult<Option<SessionRecord>> {
        self.round_trip().await?;

        let store = self.store.lock();
        Ok(store
            .active
            .get(user_id)
            .and_then(|id| store.sessions.get(id))
            .cloned())
    }

    async fn forfeit(&self, session_id: Uuid) -> ServiceResult<()> {
        self.round_trip().await?;
        self.remove(session_id)?;
        info!("[SESSION] Session {} forfeited", session_id);
        Ok(())
    }

    async fn close(&self, session_id: Uuid) -> ServiceResult<()> {
        self.round_trip().await?;
        self.remove(session_id)?;
        info!("[SESSION] Session {} closed", session_id);
        Ok(())
    }

    async fn suggest_move(&self, fen: &str) -> ServiceResult<MoveRecord> {
        self.round_trip().await?;

        let position = self
            .engine
            .load(fen)
            .map_err(|e| ServiceError::Rejected(e.to_string()))?;
        self.engine
            .legal_moves(&position)
            .first()
            .copied()
            .ok_or(ServiceError::NoSuggestion)
    }

    async fn sync_moves(&self, session_id: Uuid, moves: Vec<MoveRecord>) -> ServiceResult<()> {
        self.round_trip().await?;

        let mut store = self.store.lock();
        let record = store
            .sessions
            .get_mut(&session_id)
            .ok_or(ServiceError::SessionNotFound(session_id))?;
        debug!("[SESSION] Synced {} moves for {}", moves.len(), session_id);
        record.moves = moves;
        Ok(())
    }
}
