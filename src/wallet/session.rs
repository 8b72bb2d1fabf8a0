//! Wallet session resolution across persistence tiers.
//!
//! Which wallet the user is using is answered from, in order:
//!
//! 1. the in-memory selection for this session object
//! 2. the session-scoped store
//! 3. the persistent preference store
//! 4. provider detection, but only when exactly one non-default
//!    provider is installed
//!
//! A hit in a lower tier is promoted back up so later lookups stay
//! cheap. Detection never guesses: two or more candidate wallets is an
//! error surfaced to the caller, not a coin flip.

use super::{ProviderRegistry, WalletError, WalletKind};
use crate::store::{KeyValueStore, WalletPreferenceStore};
use std::sync::{Arc, Mutex};

const SESSION_WALLET_KEY: &str = "sb_session_wallet";

pub struct SessionResolver {
    registry: ProviderRegistry,
    selected: Mutex<Option<WalletKind>>,
    session_store: Arc<dyn KeyValueStore>,
    preference: WalletPreferenceStore,
}

impl SessionResolver {
    pub fn new(
        registry: ProviderRegistry,
        session_store: Arc<dyn KeyValueStore>,
        preference: WalletPreferenceStore,
    ) -> Self {
        Self {
            registry,
            selected: Mutex::new(None),
            session_store,
            preference,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Record an explicit wallet choice in every tier.
    pub fn select(&self, kind: WalletKind) -> Result<(), WalletError> {
        tracing::info!(wallet = %kind, "Wallet selected");
        *self.selected.lock().expect("session lock") = Some(kind);
        self.session_store
            .set(SESSION_WALLET_KEY, kind.as_str(), None)?;
        self.preference.set(kind.as_str())?;
        Ok(())
    }

    /// Determine the active wallet, falling through the tiers.
    pub fn resolve(&self) -> Result<WalletKind, WalletError> {
        if let Some(kind) = *self.selected.lock().expect("session lock") {
            return Ok(kind);
        }

        if let Some(kind) = self.read_tier(|| self.session_store.get(SESSION_WALLET_KEY))? {
            *self.selected.lock().expect("session lock") = Some(kind);
            return Ok(kind);
        }

        if let Some(kind) = self.read_tier(|| self.preference.get())? {
            tracing::debug!(wallet = %kind, "Restoring wallet from persisted preference");
            *self.selected.lock().expect("session lock") = Some(kind);
            self.session_store
                .set(SESSION_WALLET_KEY, kind.as_str(), None)?;
            return Ok(kind);
        }

        self.detect()
    }

    /// Detection heuristic of last resort. Persists its answer so the
    /// next call short-circuits.
    fn detect(&self) -> Result<WalletKind, WalletError> {
        let candidates = self.registry.detected();
        match candidates.as_slice() {
            [] => Err(WalletError::NotConnected),
            [only] => {
                tracing::info!(wallet = %only, "Single wallet detected, selecting it");
                self.select(*only)?;
                Ok(*only)
            }
            many => Err(WalletError::Ambiguous(many.to_vec())),
        }
    }

    /// Drop the session from every tier.
    pub fn invalidate(&self) -> Result<(), WalletError> {
        tracing::info!("Invalidating wallet session");
        *self.selected.lock().expect("session lock") = None;
        self.session_store.remove(SESSION_WALLET_KEY)?;
        self.preference.clear()?;
        Ok(())
    }

    /// Verify the resolved wallet's provider is still usable. A session
    /// pointing at an uninstalled provider is stale and gets
    /// invalidated before the error is surfaced.
    pub fn ensure_consistency(&self) -> Result<WalletKind, WalletError> {
        let kind = self.resolve()?;
        match self.registry.get(kind) {
            Ok(_) => Ok(kind),
            Err(e) => {
                tracing::warn!(wallet = %kind, "Session references unavailable provider, invalidating");
                self.invalidate()?;
                Err(e)
            }
        }
    }

    /// Read one store tier, tolerating values an older build may have
    /// written: unparseable entries are removed and read as empty.
    fn read_tier(
        &self,
        read: impl Fn() -> crate::store::StoreResult<Option<String>>,
    ) -> Result<Option<WalletKind>, WalletError> {
        match read()? {
            None => Ok(None),
            Some(raw) => match raw.parse::<WalletKind>() {
                Ok(kind) => Ok(Some(kind)),
                Err(_) => {
                    tracing::warn!(value = %raw, "Ignoring unparseable stored wallet id");
                    Ok(None)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::provider::test_support::FakeProvider;
    use crate::store::MemoryStore;

    const ADDR: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

    fn resolver_with(kinds: &[WalletKind]) -> SessionResolver {
        let registry = ProviderRegistry::new();
        for &kind in kinds {
            registry.register(Arc::new(FakeProvider::new(kind, ADDR)));
        }
        SessionResolver::new(
            registry,
            Arc::new(MemoryStore::new()),
            WalletPreferenceStore::new(Arc::new(MemoryStore::new())),
        )
    }

    #[test]
    fn test_no_wallet_resolves_to_not_connected() {
        let resolver = resolver_with(&[]);
        assert!(matches!(resolver.resolve(), Err(WalletError::NotConnected)));
    }

    #[test]
    fn test_single_non_default_wallet_is_detected() {
        let resolver = resolver_with(&[WalletKind::Hiro, WalletKind::Xverse]);
        assert_eq!(resolver.resolve().unwrap(), WalletKind::Xverse);
    }

    #[test]
    fn test_hiro_alone_is_not_auto_selected() {
        // The default provider being present carries no signal
        let resolver = resolver_with(&[WalletKind::Hiro]);
        assert!(matches!(resolver.resolve(), Err(WalletError::NotConnected)));
    }

    #[test]
    fn test_multiple_wallets_are_ambiguous() {
        let resolver = resolver_with(&[WalletKind::Leather, WalletKind::Xverse]);
        match resolver.resolve() {
            Err(WalletError::Ambiguous(kinds)) => {
                assert_eq!(kinds.len(), 2);
                assert!(kinds.contains(&WalletKind::Leather));
                assert!(kinds.contains(&WalletKind::Xverse));
            }
            other => panic!("expected ambiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_explicit_selection_overrides_detection() {
        let resolver = resolver_with(&[WalletKind::Leather, WalletKind::Xverse]);
        resolver.select(WalletKind::Leather).unwrap();
        assert_eq!(resolver.resolve().unwrap(), WalletKind::Leather);
    }

    #[test]
    fn test_persistent_preference_promoted_to_session() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(FakeProvider::new(WalletKind::Asigna, ADDR)));
        let session_store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let pref_store = Arc::new(MemoryStore::new());
        let preference = WalletPreferenceStore::new(pref_store);
        preference.set("asigna").unwrap();

        let resolver = SessionResolver::new(registry, session_store.clone(), preference);
        assert_eq!(resolver.resolve().unwrap(), WalletKind::Asigna);
        assert_eq!(
            session_store.get(SESSION_WALLET_KEY).unwrap().as_deref(),
            Some("asigna")
        );
    }

    #[test]
    fn test_unparseable_stored_value_falls_through() {
        let resolver = resolver_with(&[WalletKind::Xverse]);
        resolver
            .session_store
            .set(SESSION_WALLET_KEY, "not-a-wallet", None)
            .unwrap();
        // Falls through to detection instead of erroring
        assert_eq!(resolver.resolve().unwrap(), WalletKind::Xverse);
    }

    #[test]
    fn test_invalidate_clears_all_tiers() {
        let resolver = resolver_with(&[WalletKind::Xverse]);
        resolver.select(WalletKind::Xverse).unwrap();
        resolver.invalidate().unwrap();

        assert!(resolver
            .session_store
            .get(SESSION_WALLET_KEY)
            .unwrap()
            .is_none());
        assert!(resolver.preference.get().unwrap().is_none());
        // Detection still finds the installed wallet afterwards
        assert_eq!(resolver.resolve().unwrap(), WalletKind::Xverse);
    }

    #[test]
    fn test_consistency_check_invalidates_stale_session() {
        let resolver = resolver_with(&[WalletKind::Xverse]);
        resolver.select(WalletKind::Leather).unwrap();

        assert!(matches!(
            resolver.ensure_consistency(),
            Err(WalletError::ProviderUnavailable(WalletKind::Leather))
        ));
        // Session was cleared; next resolve falls back to detection
        assert_eq!(resolver.resolve().unwrap(), WalletKind::Xverse);
    }
}
