// ============================
// crates/backend-lib/src/auth/side_channel.rs
// ============================
//! Out-of-band key/value store binding a refresh token to its identity.
//!
//! Only the latest value per key is kept, so an older refresh token stops
//! matching as soon as a new one is issued for the same identity.
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::AppError;

#[async_trait]
pub trait SideChannel: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError>;

    /// Current value under `key`, if present and not expired
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

/// Side channel kept in process memory
#[derive(Debug, Clone, Default)]
pub struct MemorySideChannel {
    entries: Arc<DashMap<String, Entry>>,
}

impl MemorySideChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| now < entry.expires_at);
        before - self.entries.len()
    }
}

#[async_trait]
impl SideChannel for MemorySideChannel {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), AppError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or_else(|| AppError::InvalidInput(format!("side channel ttl {ttl:?} out of range")))?;
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        let now = Instant::now();
        Ok(self
            .entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.clone()))
    }
}
