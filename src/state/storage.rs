//! Session storage implementation
//!
//! This module keeps conversation sessions in memory for the lifetime of the
//! process. Each session sits behind its own async mutex: a caller holds that
//! lock for the whole turn, so messages for one session are processed one at a
//! time while different sessions proceed independently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{debug, info, warn};

use crate::utils::errors::{AutoStreamError, Result};
use crate::utils::logging;
use super::context::LeadSession;

/// Shared handle to a single session
pub type SessionHandle = Arc<Mutex<LeadSession>>;

/// Capacity and expiry policy for the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionPolicy {
    /// Upper bound on live sessions; unbounded when `None`
    pub max_sessions: Option<usize>,
    /// Sessions idle for longer than this are removed by cleanup
    pub idle_ttl: Option<chrono::Duration>,
}

/// In-memory session store keyed by session identifier
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
    policy: SessionPolicy,
}

impl SessionStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self::with_policy(SessionPolicy::default())
    }

    /// Create a store with an explicit capacity/expiry policy
    pub fn with_policy(policy: SessionPolicy) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            policy,
        }
    }

    pub fn policy(&self) -> &SessionPolicy {
        &self.policy
    }

    /// Get the session for `session_id`, creating a fresh one on first use
    pub async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        if let Some(handle) = self.sessions.read().await.get(session_id) {
            return handle.clone();
        }

        let mut sessions = self.sessions.write().await;
        if let Some(handle) = sessions.get(session_id) {
            return handle.clone();
        }

        if let Some(max_sessions) = self.policy.max_sessions {
            while sessions.len() >= max_sessions {
                if !Self::evict_least_recent(&mut sessions) {
                    warn!(max_sessions = max_sessions, "Session store full and every session is busy");
                    break;
                }
            }
        }

        debug!(session_id = %session_id, "Creating new session");
        let handle = Arc::new(Mutex::new(LeadSession::new(session_id)));
        sessions.insert(session_id.to_string(), handle.clone());
        handle
    }

    /// Lock the session for `session_id` for the duration of one turn
    ///
    /// Eviction only removes unlocked sessions, so a handle can disappear from
    /// the map between being resolved and being locked. Such a guard is
    /// discarded and the id is resolved again.
    pub async fn lock(&self, session_id: &str) -> OwnedMutexGuard<LeadSession> {
        loop {
            let handle = self.get_or_create(session_id).await;
            if let Some(guard) = self.lock_if_current(session_id, handle).await {
                return guard;
            }
            debug!(session_id = %session_id, "Session evicted before it was locked, resolving again");
        }
    }

    /// Lock `handle`, keeping the guard only if the map still holds it for `session_id`
    async fn lock_if_current(&self, session_id: &str, handle: SessionHandle) -> Option<OwnedMutexGuard<LeadSession>> {
        let guard = handle.clone().lock_owned().await;
        let current = self
            .sessions
            .read()
            .await
            .get(session_id)
            .map_or(false, |stored| Arc::ptr_eq(stored, &handle));

        current.then_some(guard)
    }

    /// Clone of the current state of a session
    pub async fn snapshot(&self, session_id: &str) -> Result<LeadSession> {
        let handle = self.sessions.read().await.get(session_id).cloned()
            .ok_or_else(|| AutoStreamError::SessionNotFound {
                session_id: session_id.to_string(),
            })?;

        let session = handle.lock().await;
        Ok(session.clone())
    }

    /// Remove a session; returns whether one existed
    pub async fn remove(&self, session_id: &str) -> bool {
        let removed = self.sessions.write().await.remove(session_id).is_some();
        if removed {
            debug!("Removed session {}", session_id);
        }
        removed
    }

    pub async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Remove sessions idle for longer than the policy's TTL
    pub async fn cleanup_expired(&self) -> u32 {
        let Some(ttl) = self.policy.idle_ttl else {
            return 0;
        };

        let mut sessions = self.sessions.write().await;
        let mut cleaned_count = 0;

        sessions.retain(|session_id, handle| {
            // A locked session is mid-turn and therefore not idle
            let expired = handle.try_lock().map_or(false, |session| session.is_idle_for(ttl));
            if expired {
                logging::log_session_evicted(session_id, "idle_ttl");
                cleaned_count += 1;
            }
            !expired
        });

        if cleaned_count > 0 {
            info!("Cleaned up {} expired sessions", cleaned_count);
        }

        cleaned_count
    }

    /// Get storage statistics
    ///
    /// Sessions locked by an in-flight turn are counted as busy rather than
    /// waited on.
    pub async fn get_stats(&self) -> StoreStats {
        let handles: Vec<SessionHandle> = self.sessions.read().await.values().cloned().collect();

        let mut stats = StoreStats {
            total_sessions: handles.len(),
            ..StoreStats::default()
        };

        for handle in handles {
            let Ok(session) = handle.try_lock() else {
                stats.busy_sessions += 1;
                continue;
            };
            if session.is_lead_captured() {
                stats.captured_leads += 1;
            } else if session.is_collecting_lead {
                stats.collecting_leads += 1;
            }
        }

        stats
    }

    /// Evict the unlocked session with the oldest activity
    fn evict_least_recent(sessions: &mut HashMap<String, SessionHandle>) -> bool {
        let oldest = sessions
            .iter()
            .filter_map(|(id, handle)| {
                handle.try_lock().ok().map(|session| (id.clone(), session.updated_at))
            })
            .min_by_key(|(_, updated_at)| *updated_at)
            .map(|(id, _)| id);

        match oldest {
            Some(session_id) => {
                sessions.remove(&session_id);
                logging::log_session_evicted(&session_id, "capacity");
                true
            }
            None => false,
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Storage statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub total_sessions: usize,
    pub collecting_leads: usize,
    pub captured_leads: usize,
    /// Sessions mid-turn when the stats were taken
    pub busy_sessions: usize,
}

/// Session store with automatic cleanup of idle sessions
#[derive(Debug)]
pub struct SessionStoreManager {
    store: SessionStore,
    cleanup_interval: Duration,
    cleanup_handle: Option<tokio::task::JoinHandle<()>>,
}

impl SessionStoreManager {
    pub fn new(store: SessionStore, cleanup_interval: Duration) -> Self {
        Self {
            store,
            cleanup_interval,
            cleanup_handle: None,
        }
    }

    /// Start automatic cleanup task; a no-op when the policy has no TTL
    pub fn start_cleanup(&mut self) {
        if self.cleanup_handle.is_some() {
            warn!("Cleanup task is already running");
            return;
        }

        if self.store.policy().idle_ttl.is_none() {
            debug!("No idle TTL configured, session cleanup disabled");
            return;
        }

        let store = self.store.clone();
        let interval = self.cleanup_interval;

        let handle = tokio::spawn(async move {
            let mut cleanup_interval = tokio::time::interval(interval);

            loop {
                cleanup_interval.tick().await;

                let count = store.cleanup_expired().await;
                if count > 0 {
                    info!("Cleanup task removed {} expired sessions", count);
                }
            }
        });

        self.cleanup_handle = Some(handle);
        info!("Started automatic cleanup task with interval {:?}", self.cleanup_interval);
    }

    /// Stop automatic cleanup task
    pub fn stop_cleanup(&mut self) {
        if let Some(handle) = self.cleanup_handle.take() {
            handle.abort();
            info!("Stopped automatic cleanup task");
        }
    }

    pub fn is_running(&self) -> bool {
        self.cleanup_handle.is_some()
    }

    /// Get reference to the store
    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}

impl Drop for SessionStoreManager {
    fn drop(&mut self) {
        self.stop_cleanup();
    }
}
