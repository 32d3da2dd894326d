use std::collections::HashMap;
use std::time::{Duration, Instant};

use intake_core::error::CoreError;
use intake_core::onboarding_state::{OnboardingState, OnboardingStore};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Sessions untouched for this long are evicted by [`WizardSessions::evict_idle`].
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

struct SessionEntry {
    store: OnboardingStore,
    /// Set while a submit for this session is waiting on the backend.
    submitting: bool,
    touched_at: Instant,
}

impl SessionEntry {
    fn touch(&mut self) {
        self.touched_at = Instant::now();
    }
}

/// Registry of live wizard sessions, one [`OnboardingStore`] each.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Sessions never share a store.
///
/// While a submit is in flight the session is frozen: mutations and a
/// second submit are rejected with [`CoreError::Conflict`].
pub struct WizardSessions {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_ttl: Duration,
}

impl Default for WizardSessions {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

fn not_found(id: Uuid) -> CoreError {
    CoreError::NotFound {
        entity: "OnboardingSession",
        id: id.to_string(),
    }
}

fn submit_in_progress() -> CoreError {
    CoreError::Conflict("A submission for this session is already in progress".to_string())
}

impl WizardSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl,
        }
    }

    pub fn idle_ttl(&self) -> Duration {
        self.idle_ttl
    }

    /// Start a session with the wizard opened for `service`.
    pub async fn open(&self, service: &str) -> (Uuid, OnboardingState) {
        let id = Uuid::new_v4();
        let mut store = OnboardingStore::new();
        store.open_modal(service);
        let state = store.state().clone();
        self.sessions.write().await.insert(
            id,
            SessionEntry {
                store,
                submitting: false,
                touched_at: Instant::now(),
            },
        );
        (id, state)
    }

    /// Current state of a session.
    pub async fn snapshot(&self, id: Uuid) -> Result<OnboardingState, CoreError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .map(|entry| entry.store.state().clone())
            .ok_or_else(|| not_found(id))
    }

    /// Run `f` against a session's store under the write lock.
    pub async fn with_store<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut OnboardingStore) -> R,
    ) -> Result<R, CoreError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        if entry.submitting {
            return Err(submit_in_progress());
        }
        entry.touch();
        Ok(f(&mut entry.store))
    }

    /// Freeze a session for submission and return the state to submit.
    pub async fn begin_submit(&self, id: Uuid) -> Result<OnboardingState, CoreError> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        if entry.submitting {
            return Err(submit_in_progress());
        }
        entry.submitting = true;
        entry.touch();
        Ok(entry.store.state().clone())
    }

    /// Unfreeze a session after its submit completed.
    ///
    /// On success the store is reset, provided it still holds exactly the
    /// state that was submitted. On failure the data is left for a retry.
    pub async fn finish_submit(&self, id: Uuid, submitted: &OnboardingState, succeeded: bool) {
        let mut sessions = self.sessions.write().await;
        let Some(entry) = sessions.get_mut(&id) else {
            return;
        };
        entry.submitting = false;
        entry.touch();
        if succeeded && entry.store.state() == submitted {
            entry.store.reset();
        }
    }

    /// Drop a session. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Drop every session idle for at least the configured TTL as of `now`.
    /// Returns how many were evicted.
    pub async fn evict_idle(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.saturating_duration_since(entry.touched_at) < self.idle_ttl);
        before - sessions.len()
    }

    /// Number of live sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
