//! Wallet provider abstraction.
//!
//! Each supported wallet is an injected [`WalletProvider`]
//! implementation registered with a [`ProviderRegistry`]. The registry
//! also owns the signing lease: at most one contract-call request may
//! be outstanding across all providers, because wallets misbehave when
//! handed overlapping signing prompts.

use super::{wallet_info, WalletError, WalletInfo, WalletKind};
use crate::contract::ContractCall;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

/// The account a provider reports after a successful connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedAccount {
    /// c32check Stacks address.
    pub address: String,
}

/// One wallet's capabilities, as exposed to the rest of the app.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    fn kind(&self) -> WalletKind;

    /// Whether the provider is actually usable right now. Registered
    /// providers default to available.
    fn is_available(&self) -> bool {
        true
    }

    /// Prompt the wallet to connect and report the selected account.
    async fn connect(&self) -> Result<ConnectedAccount, WalletError>;

    /// Ask the wallet to sign and broadcast a contract call. Returns
    /// the transaction id on success.
    async fn request_contract_call(&self, call: &ContractCall) -> Result<String, WalletError>;
}

/// Exclusive permission to run one signing flow. Dropping the lease
/// releases it.
pub struct SigningLease {
    _guard: OwnedMutexGuard<()>,
}

/// The set of currently-registered wallet providers.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Arc<Mutex<HashMap<WalletKind, Arc<dyn WalletProvider>>>>,
    signing: Arc<tokio::sync::Mutex<()>>,
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            providers: Arc::new(Mutex::new(HashMap::new())),
            signing: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub fn register(&self, provider: Arc<dyn WalletProvider>) {
        let kind = provider.kind();
        tracing::debug!(wallet = %kind, "Registering wallet provider");
        self.providers
            .lock()
            .expect("provider registry lock")
            .insert(kind, provider);
    }

    pub fn unregister(&self, kind: WalletKind) {
        self.providers
            .lock()
            .expect("provider registry lock")
            .remove(&kind);
    }

    pub fn get(&self, kind: WalletKind) -> Result<Arc<dyn WalletProvider>, WalletError> {
        self.providers
            .lock()
            .expect("provider registry lock")
            .get(&kind)
            .filter(|p| p.is_available())
            .cloned()
            .ok_or(WalletError::ProviderUnavailable(kind))
    }

    /// All registered, available providers.
    pub fn installed(&self) -> Vec<WalletKind> {
        let mut kinds: Vec<WalletKind> = self
            .providers
            .lock()
            .expect("provider registry lock")
            .values()
            .filter(|p| p.is_available())
            .map(|p| p.kind())
            .collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }

    /// Installed providers excluding the default one. Only these carry
    /// signal about which wallet the user deliberately installed.
    pub fn detected(&self) -> Vec<WalletKind> {
        self.installed()
            .into_iter()
            .filter(|k| !k.is_default_provider())
            .collect()
    }

    /// Metadata for every supported wallet, with `installed` set from
    /// this registry. Suitable for a wallet-picker UI as-is.
    pub fn directory(&self) -> Vec<WalletInfo> {
        let installed = self.installed();
        WalletKind::ALL
            .into_iter()
            .map(|kind| {
                let mut info = wallet_info(kind);
                info.installed = installed.contains(&kind);
                info
            })
            .collect()
    }

    /// Acquire the signing lease, failing immediately if another
    /// signing flow is still running.
    pub fn try_lease(&self) -> Result<SigningLease, WalletError> {
        match Arc::clone(&self.signing).try_lock_owned() {
            Ok(guard) => Ok(SigningLease { _guard: guard }),
            Err(_) => Err(WalletError::OperationInProgress),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::FakeProvider;
    use super::*;
    use std::sync::atomic::Ordering;

    const ADDR: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

    #[test]
    fn test_get_unregistered_provider_fails() {
        let registry = ProviderRegistry::new();
        assert!(matches!(
            registry.get(WalletKind::Leather),
            Err(WalletError::ProviderUnavailable(WalletKind::Leather))
        ));
    }

    #[test]
    fn test_unavailable_provider_not_returned() {
        let registry = ProviderRegistry::new();
        let provider = Arc::new(FakeProvider::new(WalletKind::Xverse, ADDR));
        provider.available.store(false, Ordering::SeqCst);
        registry.register(provider);

        assert!(registry.get(WalletKind::Xverse).is_err());
        assert!(registry.installed().is_empty());
    }

    #[test]
    fn test_detected_excludes_default_provider() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(FakeProvider::new(WalletKind::Hiro, ADDR)));
        registry.register(Arc::new(FakeProvider::new(WalletKind::Leather, ADDR)));

        assert_eq!(registry.detected(), vec![WalletKind::Leather]);
        assert_eq!(registry.installed().len(), 2);
    }

    #[test]
    fn test_directory_marks_installed_wallets() {
        let registry = ProviderRegistry::new();
        registry.register(Arc::new(FakeProvider::new(WalletKind::Xverse, ADDR)));

        let directory = registry.directory();
        assert_eq!(directory.len(), WalletKind::ALL.len());
        for info in &directory {
            assert_eq!(info.installed, info.kind == WalletKind::Xverse);
            assert!(!info.description.is_empty());
        }
    }

    #[test]
    fn test_signing_lease_is_exclusive() {
        let registry = ProviderRegistry::new();
        let lease = registry.try_lease().unwrap();
        assert!(matches!(
            registry.try_lease(),
            Err(WalletError::OperationInProgress)
        ));
        drop(lease);
        assert!(registry.try_lease().is_ok());
    }
}
