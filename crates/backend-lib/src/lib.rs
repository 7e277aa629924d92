// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the employee management server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use crate::auth::{
    AuthService, Clock, DefaultAuth, MemorySideChannel, RoleEnricher, SessionCache, SideChannel,
    SystemClock, TokenIssuer,
};
use crate::config::Settings;
use crate::error::AppError;
use crate::storage::Storage;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// Authentication service
    pub auth: Arc<dyn AuthService>,
    /// Enriched users of recent logins
    pub sessions: SessionCache,
    /// Settings manager
    pub settings: Arc<Settings>,
    /// Storage backend
    pub storage: S,
}

impl<S: Storage> AppState<S> {
    /// Create a new application state
    pub fn new(storage: S, settings: &Settings) -> Result<Self, AppError> {
        Self::with_clock(storage, settings, Arc::new(SystemClock))
    }

    /// Create a new application state reading wall-clock time from `clock`
    pub fn with_clock(
        storage: S,
        settings: &Settings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let sessions = SessionCache::new(settings.session_cache_ttl());
        let side_channel: Arc<dyn SideChannel> = Arc::new(MemorySideChannel::new());
        let tokens = TokenIssuer::from_settings(&settings.jwt, side_channel)?;
        let enricher = RoleEnricher::new(Arc::new(storage.clone()), clock, settings.timezone()?);
        let auth = Arc::new(DefaultAuth::new(
            Arc::new(storage.clone()),
            enricher,
            tokens,
            sessions.clone(),
            settings.password_requirements.clone(),
        ));

        Ok(Self {
            auth,
            sessions,
            settings: Arc::new(settings.clone()),
            storage,
        })
    }
}
