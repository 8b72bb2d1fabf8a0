//! Wallet-layer errors.

use super::WalletKind;
use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    /// More than one non-default provider is installed and no stored
    /// preference disambiguates; the user must choose explicitly.
    #[error("multiple wallets detected ({}); explicit selection required", format_kinds(.0))]
    Ambiguous(Vec<WalletKind>),
    #[error("unknown wallet: {0}")]
    UnknownWallet(String),
    #[error("no wallet connected")]
    NotConnected,
    #[error("wallet provider not installed: {0}")]
    ProviderUnavailable(WalletKind),
    #[error("a connection attempt is already in progress")]
    ConnectionInProgress,
    #[error("another signing operation is in progress")]
    OperationInProgress,
    #[error("the user cancelled the request")]
    UserCancelled,
    #[error("wallet provider error: {0}")]
    Provider(String),
    #[error("session store error: {0}")]
    Store(#[from] StoreError),
}

fn format_kinds(kinds: &[WalletKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
