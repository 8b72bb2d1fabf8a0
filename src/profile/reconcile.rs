//! Chain/cache reconciliation.
//!
//! The chain is the source of truth for profiles; the local cache only
//! exists to bridge the gap while a transaction confirms or the network
//! is unreachable. The policy distinguishes two situations that look
//! alike from the caller's seat but must not be conflated:
//!
//! - the chain definitively says "no profile" — stale local data is
//!   deleted and the caller sees [`ProfileLookup::ConfirmedAbsent`]
//! - the chain could not be reached — local data is kept and returned
//!   as [`ProfileLookup::Unknown`]

use super::{DeveloperProfile, ProfileStats};
use crate::contract::ContractError;
use crate::store::ProfileCache;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// Read-side contract surface, abstracted so the reconciliation policy
/// can be exercised without a live Stacks node.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn profile_exists(&self, address: &str) -> Result<bool, ContractError>;
    async fn fetch_profile(&self, address: &str)
        -> Result<Option<DeveloperProfile>, ContractError>;
    async fn fetch_stats(&self, address: &str) -> Result<Option<ProfileStats>, ContractError>;
    async fn total_profiles(&self) -> Result<u64, ContractError>;
}

/// Outcome of a profile read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProfileLookup {
    /// The chain returned the profile.
    Confirmed { profile: DeveloperProfile },
    /// The chain definitively reported no profile for the address.
    ConfirmedAbsent,
    /// The chain was unreachable; the last cached profile, if any.
    Unknown { cached: Option<DeveloperProfile> },
}

/// Outcome of an existence check, with the same two-state distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilePresence {
    Present,
    Absent,
    /// Chain unreachable; whether the local "created" marker is set.
    Unknown { cached: bool },
}

/// Profile reads with cache reconciliation applied.
pub struct ProfileReader {
    source: Arc<dyn ProfileSource>,
    cache: ProfileCache,
}

impl ProfileReader {
    pub fn new(source: Arc<dyn ProfileSource>, cache: ProfileCache) -> Self {
        Self { source, cache }
    }

    /// Fetch a profile, preferring the chain. A confirmed read refreshes
    /// the cache; a confirmed absence purges it; a read failure leaves
    /// the cache untouched and falls back to it.
    pub async fn lookup(&self, address: &str) -> ProfileLookup {
        match self.source.fetch_profile(address).await {
            Ok(Some(profile)) => {
                if let Err(e) = self.cache.set_profile(address, &profile) {
                    tracing::warn!(address, error = %e, "Failed to refresh profile cache");
                }
                ProfileLookup::Confirmed { profile }
            }
            Ok(None) => {
                // An unconfirmed local creation may still be in flight;
                // only a missing created-marker makes absence final.
                if self.cache.has_created(address).unwrap_or(false) {
                    match self.cache.profile(address) {
                        Ok(cached @ Some(_)) => {
                            tracing::debug!(
                                address,
                                "Profile absent on chain but locally created, awaiting confirmation"
                            );
                            return ProfileLookup::Unknown { cached };
                        }
                        Ok(None) => {}
                        Err(e) => {
                            tracing::warn!(address, error = %e, "Cache read failed");
                        }
                    }
                }

                tracing::debug!(address, "Chain confirmed profile absent, clearing local cache");
                if let Err(e) = self
                    .cache
                    .remove_created(address)
                    .and_then(|_| self.cache.remove_profile(address))
                {
                    tracing::warn!(address, error = %e, "Failed to clear stale cache");
                }
                ProfileLookup::ConfirmedAbsent
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "Chain read failed, using last known local state");
                let cached = self.cache.profile(address).unwrap_or(None);
                ProfileLookup::Unknown { cached }
            }
        }
    }

    /// Answer "does a profile exist for this address".
    pub async fn exists(&self, address: &str) -> ProfilePresence {
        match self.source.profile_exists(address).await {
            Ok(true) => ProfilePresence::Present,
            Ok(false) => {
                tracing::debug!(address, "Chain confirmed no profile, cleaning up local data");
                if let Err(e) = self
                    .cache
                    .remove_created(address)
                    .and_then(|_| self.cache.remove_profile(address))
                {
                    tracing::warn!(address, error = %e, "Failed to clear stale cache");
                }
                ProfilePresence::Absent
            }
            Err(e) => {
                tracing::warn!(address, error = %e, "Existence check failed, falling back to local marker");
                ProfilePresence::Unknown {
                    cached: self.cache.has_created(address).unwrap_or(false),
                }
            }
        }
    }

    pub async fn stats(&self, address: &str) -> Result<Option<ProfileStats>, ContractError> {
        self.source.fetch_stats(address).await
    }

    pub async fn total(&self) -> Result<u64, ContractError> {
        self.source.total_profiles().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Mutex;

    const ADDR: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

    /// Scripted source: each call pops the next programmed response.
    struct StubSource {
        profile: Mutex<Option<Result<Option<DeveloperProfile>, ContractError>>>,
        exists: Mutex<Option<Result<bool, ContractError>>>,
    }

    impl StubSource {
        fn profile(result: Result<Option<DeveloperProfile>, ContractError>) -> Self {
            Self {
                profile: Mutex::new(Some(result)),
                exists: Mutex::new(None),
            }
        }

        fn existence(result: Result<bool, ContractError>) -> Self {
            Self {
                profile: Mutex::new(None),
                exists: Mutex::new(Some(result)),
            }
        }
    }

    #[async_trait]
    impl ProfileSource for StubSource {
        async fn profile_exists(&self, _address: &str) -> Result<bool, ContractError> {
            self.exists.lock().unwrap().take().expect("unexpected exists call")
        }

        async fn fetch_profile(
            &self,
            _address: &str,
        ) -> Result<Option<DeveloperProfile>, ContractError> {
            self.profile.lock().unwrap().take().expect("unexpected profile call")
        }

        async fn fetch_stats(
            &self,
            _address: &str,
        ) -> Result<Option<ProfileStats>, ContractError> {
            Ok(None)
        }

        async fn total_profiles(&self) -> Result<u64, ContractError> {
            Ok(0)
        }
    }

    fn cache_with_profile() -> ProfileCache {
        let cache = ProfileCache::new(Arc::new(MemoryStore::new()));
        cache.mark_created(ADDR).unwrap();
        cache
            .set_profile(ADDR, &DeveloperProfile::new(ADDR, "Cached Alice", "bio"))
            .unwrap();
        cache
    }

    #[tokio::test]
    async fn test_confirmed_read_refreshes_cache() {
        let chain_profile = DeveloperProfile::new(ADDR, "Chain Alice", "bio");
        let source = Arc::new(StubSource::profile(Ok(Some(chain_profile.clone()))));
        let cache = ProfileCache::new(Arc::new(MemoryStore::new()));
        let reader = ProfileReader::new(source, cache.clone());

        let lookup = reader.lookup(ADDR).await;
        assert_eq!(
            lookup,
            ProfileLookup::Confirmed {
                profile: chain_profile
            }
        );
        assert_eq!(
            cache.profile(ADDR).unwrap().unwrap().display_name,
            "Chain Alice"
        );
    }

    #[tokio::test]
    async fn test_confirmed_absent_clears_cache_without_marker() {
        let source = Arc::new(StubSource::profile(Ok(None)));
        let cache = ProfileCache::new(Arc::new(MemoryStore::new()));
        cache
            .set_profile(ADDR, &DeveloperProfile::new(ADDR, "Stale", "bio"))
            .unwrap();
        let reader = ProfileReader::new(source, cache.clone());

        let lookup = reader.lookup(ADDR).await;
        assert_eq!(lookup, ProfileLookup::ConfirmedAbsent);
        assert!(cache.profile(ADDR).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_absent_with_pending_creation_returns_unknown() {
        // Submitted locally, not yet confirmed on chain
        let source = Arc::new(StubSource::profile(Ok(None)));
        let cache = cache_with_profile();
        let reader = ProfileReader::new(source, cache.clone());

        let lookup = reader.lookup(ADDR).await;
        match lookup {
            ProfileLookup::Unknown { cached: Some(p) } => {
                assert_eq!(p.display_name, "Cached Alice")
            }
            other => panic!("expected Unknown with cached profile, got {other:?}"),
        }
        // Pending creation is not purged
        assert!(cache.has_created(ADDR).unwrap());
    }

    #[tokio::test]
    async fn test_read_failure_never_clears_cache() {
        let source = Arc::new(StubSource::profile(Err(ContractError::Unreachable)));
        let cache = cache_with_profile();
        let reader = ProfileReader::new(source, cache.clone());

        let lookup = reader.lookup(ADDR).await;
        match lookup {
            ProfileLookup::Unknown { cached: Some(p) } => {
                assert_eq!(p.display_name, "Cached Alice")
            }
            other => panic!("expected Unknown with cached profile, got {other:?}"),
        }
        assert!(cache.profile(ADDR).unwrap().is_some());
        assert!(cache.has_created(ADDR).unwrap());
    }

    #[tokio::test]
    async fn test_exists_confirmed_absent_clears_marker() {
        let source = Arc::new(StubSource::existence(Ok(false)));
        let cache = cache_with_profile();
        let reader = ProfileReader::new(source, cache.clone());

        assert_eq!(reader.exists(ADDR).await, ProfilePresence::Absent);
        assert!(!cache.has_created(ADDR).unwrap());
        assert!(cache.profile(ADDR).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exists_failure_falls_back_to_marker() {
        let source = Arc::new(StubSource::existence(Err(ContractError::Timeout)));
        let cache = cache_with_profile();
        let reader = ProfileReader::new(source, cache.clone());

        assert_eq!(
            reader.exists(ADDR).await,
            ProfilePresence::Unknown { cached: true }
        );
        assert!(cache.has_created(ADDR).unwrap());
    }
}
