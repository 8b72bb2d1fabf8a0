//! One-shot migration of legacy flat keys into the current store.
//!
//! Earlier releases kept profile markers and the wallet preference under
//! ad hoc keys in a separate store. Each legacy key moves over exactly
//! once; a value already present in the current store wins, and the
//! legacy key is deleted either way.

use super::{KeyValueStore, StoreResult};
use chrono::Duration;

const LEGACY_WALLET_KEY: &str = "stacksbuilder-wallet";
const CURRENT_WALLET_KEY: &str = "sb_wallet_pref";

const PROFILE_TTL_DAYS: i64 = 30;
const WALLET_TTL_DAYS: i64 = 7;

/// Migrate the wallet preference and, when an address is known, that
/// address's profile marker and data. Returns the number of keys moved.
pub fn migrate_legacy_data(
    legacy: &dyn KeyValueStore,
    current: &dyn KeyValueStore,
    address: Option<&str>,
) -> StoreResult<usize> {
    let mut moved = 0;

    moved += migrate_key(
        legacy,
        current,
        LEGACY_WALLET_KEY,
        CURRENT_WALLET_KEY,
        Duration::days(WALLET_TTL_DAYS),
    )?;

    if let Some(address) = address {
        moved += migrate_key(
            legacy,
            current,
            &format!("profile-created-{address}"),
            &format!("sb_profile_created_{address}"),
            Duration::days(PROFILE_TTL_DAYS),
        )?;
        moved += migrate_key(
            legacy,
            current,
            &format!("profile-data-{address}"),
            &format!("sb_profile_data_{address}"),
            Duration::days(PROFILE_TTL_DAYS),
        )?;
    }

    if moved > 0 {
        tracing::info!(moved, "Migrated legacy store keys");
    }
    Ok(moved)
}

fn migrate_key(
    legacy: &dyn KeyValueStore,
    current: &dyn KeyValueStore,
    legacy_key: &str,
    current_key: &str,
    ttl: Duration,
) -> StoreResult<usize> {
    let Some(value) = legacy.get(legacy_key)? else {
        return Ok(0);
    };

    let moved = if current.get(current_key)?.is_none() {
        current.set(current_key, &value, Some(ttl))?;
        1
    } else {
        0
    };

    legacy.remove(legacy_key)?;
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const ADDR: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

    #[test]
    fn test_moves_legacy_keys_once() {
        let legacy = MemoryStore::new();
        let current = MemoryStore::new();

        legacy.set(LEGACY_WALLET_KEY, "leather", None).unwrap();
        legacy
            .set(&format!("profile-created-{ADDR}"), "true", None)
            .unwrap();

        let moved = migrate_legacy_data(&legacy, &current, Some(ADDR)).unwrap();
        assert_eq!(moved, 2);
        assert_eq!(
            current.get(CURRENT_WALLET_KEY).unwrap().as_deref(),
            Some("leather")
        );
        assert_eq!(legacy.get(LEGACY_WALLET_KEY).unwrap(), None);

        // Second run is a no-op
        let moved = migrate_legacy_data(&legacy, &current, Some(ADDR)).unwrap();
        assert_eq!(moved, 0);
    }

    #[test]
    fn test_existing_current_value_wins() {
        let legacy = MemoryStore::new();
        let current = MemoryStore::new();

        legacy.set(LEGACY_WALLET_KEY, "hiro", None).unwrap();
        current.set(CURRENT_WALLET_KEY, "xverse", None).unwrap();

        let moved = migrate_legacy_data(&legacy, &current, None).unwrap();
        assert_eq!(moved, 0);
        assert_eq!(
            current.get(CURRENT_WALLET_KEY).unwrap().as_deref(),
            Some("xverse")
        );
        // Legacy key still cleaned up
        assert_eq!(legacy.get(LEGACY_WALLET_KEY).unwrap(), None);
    }
}
