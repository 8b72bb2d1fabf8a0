//! Persistence Helpers
//!
//! Key-value stores backing wallet-session persistence, profile caching,
//! and form drafts. Two tiers exist:
//! - [`MemoryStore`]: session-scoped, lost when the process exits
//! - [`FileStore`]: long-lived, JSON file under the data directory
//!
//! Every entry may carry an expiry timestamp. Expired entries read as
//! absent and are purged on access.

mod cache;
mod draft;
mod file;
mod memory;
mod migration;

pub use cache::{ProfileCache, WalletPreferenceStore};
pub use draft::{DraftMode, DraftStore, DRAFT_EXPIRY_HOURS};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use migration::migrate_legacy_data;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A stored value with an optional expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub value: String,
    /// Unix millis after which the entry reads as absent.
    pub expires_at: Option<i64>,
}

impl Entry {
    pub fn new(value: impl Into<String>, ttl: Option<Duration>) -> Self {
        Self {
            value: value.into(),
            expires_at: ttl.map(|d| (Utc::now() + d).timestamp_millis()),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => now.timestamp_millis() > at,
            None => false,
        }
    }
}

/// Common interface over the persistence tiers.
///
/// Implementations are expected to purge expired entries lazily: a `get`
/// on an expired key returns `None` and removes the entry.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    /// All live (non-expired) keys.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;
