//! Connection lifecycle.

use super::{ConnectedAccount, SessionResolver, WalletError, WalletKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Drives connect/disconnect against the resolved wallet and holds the
/// connected account. At most one connect flow runs at a time; a second
/// attempt while one is in flight is rejected rather than queued, since
/// the wallet is already showing the user a prompt.
pub struct ConnectManager {
    resolver: Arc<SessionResolver>,
    connecting: AtomicBool,
    account: Mutex<Option<ConnectedAccount>>,
}

struct ConnectingGuard<'a>(&'a AtomicBool);

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl ConnectManager {
    pub fn new(resolver: Arc<SessionResolver>) -> Self {
        Self {
            resolver,
            connecting: AtomicBool::new(false),
            account: Mutex::new(None),
        }
    }

    pub fn resolver(&self) -> &SessionResolver {
        &self.resolver
    }

    /// Connect to an explicitly chosen wallet, or to whatever the
    /// session resolves to when `kind` is `None`.
    pub async fn connect(
        &self,
        kind: Option<WalletKind>,
    ) -> Result<ConnectedAccount, WalletError> {
        if self.connecting.swap(true, Ordering::SeqCst) {
            return Err(WalletError::ConnectionInProgress);
        }
        let _guard = ConnectingGuard(&self.connecting);

        let kind = match kind {
            Some(kind) => {
                self.resolver.select(kind)?;
                kind
            }
            None => self.resolver.resolve()?,
        };

        let provider = self.resolver.registry().get(kind)?;
        tracing::info!(wallet = %kind, "Connecting wallet");
        let account = provider.connect().await?;
        tracing::info!(wallet = %kind, address = %account.address, "Wallet connected");

        *self.account.lock().expect("account lock") = Some(account.clone());
        Ok(account)
    }

    /// Drop the connected account and invalidate the session.
    pub fn disconnect(&self) -> Result<(), WalletError> {
        *self.account.lock().expect("account lock") = None;
        self.resolver.invalidate()
    }

    pub fn account(&self) -> Option<ConnectedAccount> {
        self.account.lock().expect("account lock").clone()
    }

    pub fn is_connected(&self) -> bool {
        self.account.lock().expect("account lock").is_some()
    }

    /// The connected address, or [`WalletError::NotConnected`].
    pub fn address(&self) -> Result<String, WalletError> {
        self.account()
            .map(|a| a.address)
            .ok_or(WalletError::NotConnected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, WalletPreferenceStore};
    use crate::wallet::provider::test_support::FakeProvider;
    use crate::wallet::{ProviderRegistry, WalletProvider};
    use async_trait::async_trait;
    use tokio::sync::Notify;

    const ADDR: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

    fn manager_with(kinds: &[WalletKind]) -> ConnectManager {
        let registry = ProviderRegistry::new();
        for &kind in kinds {
            registry.register(Arc::new(FakeProvider::new(kind, ADDR)));
        }
        ConnectManager::new(Arc::new(SessionResolver::new(
            registry,
            Arc::new(MemoryStore::new()),
            WalletPreferenceStore::new(Arc::new(MemoryStore::new())),
        )))
    }

    #[tokio::test]
    async fn test_connect_and_disconnect() {
        let manager = manager_with(&[WalletKind::Leather]);
        assert!(!manager.is_connected());

        let account = manager.connect(Some(WalletKind::Leather)).await.unwrap();
        assert_eq!(account.address, ADDR);
        assert!(manager.is_connected());
        assert_eq!(manager.address().unwrap(), ADDR);

        manager.disconnect().unwrap();
        assert!(!manager.is_connected());
        assert!(matches!(
            manager.address(),
            Err(WalletError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_connect_uses_resolution_when_unspecified() {
        let manager = manager_with(&[WalletKind::Hiro, WalletKind::Xverse]);
        let account = manager.connect(None).await.unwrap();
        assert_eq!(account.address, ADDR);
        assert_eq!(
            manager.resolver().resolve().unwrap(),
            WalletKind::Xverse
        );
    }

    #[tokio::test]
    async fn test_ambiguous_detection_fails_connect() {
        let manager = manager_with(&[WalletKind::Leather, WalletKind::Xverse]);
        assert!(matches!(
            manager.connect(None).await,
            Err(WalletError::Ambiguous(_))
        ));
    }

    struct StallingProvider {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl WalletProvider for StallingProvider {
        fn kind(&self) -> WalletKind {
            WalletKind::Leather
        }

        async fn connect(&self) -> Result<ConnectedAccount, WalletError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(ConnectedAccount {
                address: ADDR.to_string(),
            })
        }

        async fn request_contract_call(
            &self,
            _call: &crate::contract::ContractCall,
        ) -> Result<String, WalletError> {
            Err(WalletError::Provider("not under test".to_string()))
        }
    }

    #[tokio::test]
    async fn test_second_connect_rejected_while_first_in_flight() {
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(StallingProvider {
            entered: entered.clone(),
            release: release.clone(),
        }));

        let manager = Arc::new(ConnectManager::new(Arc::new(SessionResolver::new(
            registry,
            Arc::new(MemoryStore::new()),
            WalletPreferenceStore::new(Arc::new(MemoryStore::new())),
        ))));

        let first = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.connect(Some(WalletKind::Leather)).await })
        };
        entered.notified().await;

        assert!(matches!(
            manager.connect(Some(WalletKind::Leather)).await,
            Err(WalletError::ConnectionInProgress)
        ));

        release.notify_one();
        assert!(first.await.unwrap().is_ok());

        // Guard was released; a fresh connect succeeds
        release.notify_one();
        assert!(manager.connect(Some(WalletKind::Leather)).await.is_ok());
    }
}
