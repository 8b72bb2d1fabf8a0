//! Wallet Integration
//!
//! Provider registration, session resolution across persistence tiers,
//! and connection lifecycle for the Stacks wallets we support.

mod connect;
mod error;
mod provider;
mod session;

pub use connect::ConnectManager;
pub use error::WalletError;
pub use provider::{ConnectedAccount, ProviderRegistry, SigningLease, WalletProvider};
pub use session::SessionResolver;

#[cfg(test)]
pub(crate) use provider::test_support;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The wallets we can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletKind {
    Hiro,
    Leather,
    Xverse,
    Asigna,
}

impl WalletKind {
    pub const ALL: [WalletKind; 4] = [
        WalletKind::Hiro,
        WalletKind::Leather,
        WalletKind::Xverse,
        WalletKind::Asigna,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hiro => "hiro",
            Self::Leather => "leather",
            Self::Xverse => "xverse",
            Self::Asigna => "asigna",
        }
    }

    /// Hiro ships as the default provider and is present even when the
    /// user never chose it, so its presence alone says nothing about
    /// which wallet the user actually uses.
    pub fn is_default_provider(&self) -> bool {
        matches!(self, Self::Hiro)
    }
}

impl fmt::Display for WalletKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletKind {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hiro" => Ok(Self::Hiro),
            "leather" => Ok(Self::Leather),
            "xverse" => Ok(Self::Xverse),
            "asigna" => Ok(Self::Asigna),
            other => Err(WalletError::UnknownWallet(other.to_string())),
        }
    }
}

/// Descriptive metadata for a wallet, for UI surfaces. `installed`
/// reflects the registry the info was derived from; the bare
/// [`wallet_info`] lookup reports it as `false`.
#[derive(Debug, Clone, Serialize)]
pub struct WalletInfo {
    pub kind: WalletKind,
    pub name: &'static str,
    pub description: &'static str,
    pub download_url: &'static str,
    pub installed: bool,
}

pub fn wallet_info(kind: WalletKind) -> WalletInfo {
    match kind {
        WalletKind::Hiro => WalletInfo {
            kind,
            name: "Hiro Wallet",
            description: "The original Stacks web wallet",
            download_url: "https://wallet.hiro.so",
            installed: false,
        },
        WalletKind::Leather => WalletInfo {
            kind,
            name: "Leather",
            description: "Browser extension wallet for Stacks and Bitcoin",
            download_url: "https://leather.io",
            installed: false,
        },
        WalletKind::Xverse => WalletInfo {
            kind,
            name: "Xverse",
            description: "Bitcoin and Stacks wallet with Ordinals support",
            download_url: "https://www.xverse.app",
            installed: false,
        },
        WalletKind::Asigna => WalletInfo {
            kind,
            name: "Asigna Multisig",
            description: "Multisig wallet for teams on Stacks",
            download_url: "https://asigna.io",
            installed: false,
        },
    }
}
