//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::{ApiConfig, ContractSection};
use crate::profile::{ProfileReader, ProfileSource};
use crate::store::ProfileCache;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Profile reads with reconciliation applied
    pub reader: Arc<ProfileReader>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Contract settings, for reporting which network we serve
    pub contract: Arc<ContractSection>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        source: Arc<dyn ProfileSource>,
        cache: ProfileCache,
        config: ApiConfig,
        contract: ContractSection,
    ) -> Self {
        Self {
            reader: Arc::new(ProfileReader::new(source, cache)),
            config: Arc::new(config),
            contract: Arc::new(contract),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
