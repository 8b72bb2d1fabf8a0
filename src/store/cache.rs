//! Profile cache and wallet preference storage.
//!
//! The cache is a UX convenience, not a system of record: the chain owns
//! profile truth, and the reconciliation layer decides when cached data
//! may be shown or must be discarded.

use super::{KeyValueStore, StoreResult};
use crate::profile::DeveloperProfile;
use chrono::Duration;
use std::sync::Arc;

const PROFILE_CREATED_PREFIX: &str = "sb_profile_created_";
const PROFILE_DATA_PREFIX: &str = "sb_profile_data_";
const WALLET_PREFERENCE_KEY: &str = "sb_wallet_pref";

const PROFILE_TTL_DAYS: i64 = 30;
const WALLET_PREFERENCE_TTL_DAYS: i64 = 7;

/// Per-address cached profile data plus the "profile created" marker.
#[derive(Clone)]
pub struct ProfileCache {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Mark that the given address has submitted a profile creation.
    pub fn mark_created(&self, address: &str) -> StoreResult<()> {
        self.store.set(
            &format!("{PROFILE_CREATED_PREFIX}{address}"),
            "true",
            Some(Duration::days(PROFILE_TTL_DAYS)),
        )
    }

    pub fn has_created(&self, address: &str) -> StoreResult<bool> {
        Ok(self
            .store
            .get(&format!("{PROFILE_CREATED_PREFIX}{address}"))?
            .as_deref()
            == Some("true"))
    }

    pub fn remove_created(&self, address: &str) -> StoreResult<()> {
        self.store
            .remove(&format!("{PROFILE_CREATED_PREFIX}{address}"))
    }

    pub fn set_profile(&self, address: &str, profile: &DeveloperProfile) -> StoreResult<()> {
        let json = serde_json::to_string(profile)?;
        self.store.set(
            &format!("{PROFILE_DATA_PREFIX}{address}"),
            &json,
            Some(Duration::days(PROFILE_TTL_DAYS)),
        )
    }

    /// Last cached profile for the address, if any. Unparseable cached
    /// data reads as absent rather than failing the caller.
    pub fn profile(&self, address: &str) -> StoreResult<Option<DeveloperProfile>> {
        let Some(json) = self.store.get(&format!("{PROFILE_DATA_PREFIX}{address}"))? else {
            return Ok(None);
        };
        match serde_json::from_str(&json) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                tracing::warn!(address, error = %e, "Discarding unparseable cached profile");
                self.remove_profile(address)?;
                Ok(None)
            }
        }
    }

    pub fn remove_profile(&self, address: &str) -> StoreResult<()> {
        self.store.remove(&format!("{PROFILE_DATA_PREFIX}{address}"))
    }

    /// Drop every key scoped to the address: created marker, cached
    /// profile data, and any form drafts.
    pub fn delete_all(&self, address: &str) -> StoreResult<()> {
        for key in self.store.keys()? {
            if key.contains(address) {
                self.store.remove(&key)?;
            }
        }
        Ok(())
    }
}

/// The user's preferred wallet, persisted across sessions.
#[derive(Clone)]
pub struct WalletPreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl WalletPreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> StoreResult<Option<String>> {
        self.store.get(WALLET_PREFERENCE_KEY)
    }

    pub fn set(&self, wallet_id: &str) -> StoreResult<()> {
        self.store.set(
            WALLET_PREFERENCE_KEY,
            wallet_id,
            Some(Duration::days(WALLET_PREFERENCE_TTL_DAYS)),
        )
    }

    pub fn clear(&self) -> StoreResult<()> {
        self.store.remove(WALLET_PREFERENCE_KEY)
    }
}
