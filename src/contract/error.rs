//! Contract-layer errors and provider failure categorization.

use super::ClarityError;
use crate::profile::FieldError;
use crate::wallet::WalletError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("clarity codec error: {0}")]
    Clarity(#[from] ClarityError),
    #[error("request failed: {0}")]
    Request(String),
    #[error("request to Stacks node timed out")]
    Timeout,
    #[error("Stacks node unreachable")]
    Unreachable,
    #[error("read-only call rejected: {0}")]
    CallFailed(String),
    #[error("unexpected node response: {0}")]
    UnexpectedResponse(String),
    #[error(transparent)]
    Wallet(#[from] WalletError),
    #[error("profile validation failed")]
    Validation(Vec<FieldError>),
}

/// Broad classification of a failed transaction submission, derived
/// from the free-text message the wallet provider hands back. Used to
/// pick a user-facing message; no category triggers an automatic retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Cancelled,
    InsufficientFunds,
    NonceConflict,
    NotFound,
    Provider,
}

impl ErrorCategory {
    /// Classify a provider error message by substring. Providers do not
    /// expose structured codes, so this is deliberately permissive.
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("cancel") || lower.contains("denied") || lower.contains("rejected") {
            Self::Cancelled
        } else if lower.contains("insufficient") {
            Self::InsufficientFunds
        } else if lower.contains("nonce") || lower.contains("conflictingnonceinmempool") {
            Self::NonceConflict
        } else if lower.contains("not found") || lower.contains("nosuchcontract") {
            Self::NotFound
        } else {
            Self::Provider
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Cancelled => "Transaction was cancelled in the wallet",
            Self::InsufficientFunds => "Insufficient STX to cover the transaction fee",
            Self::NonceConflict => {
                "A previous transaction is still pending; wait for it to confirm and try again"
            }
            Self::NotFound => "The profile contract was not found on this network",
            Self::Provider => "The wallet reported an error; please try again",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_variants() {
        for msg in [
            "User canceled the request",
            "Request denied by user",
            "the user rejected the transaction",
        ] {
            assert_eq!(ErrorCategory::from_message(msg), ErrorCategory::Cancelled);
        }
    }

    #[test]
    fn test_insufficient_funds() {
        assert_eq!(
            ErrorCategory::from_message("NotEnoughFunds: insufficient balance"),
            ErrorCategory::InsufficientFunds
        );
    }

    #[test]
    fn test_nonce_conflict() {
        assert_eq!(
            ErrorCategory::from_message("ConflictingNonceInMempool"),
            ErrorCategory::NonceConflict
        );
        assert_eq!(
            ErrorCategory::from_message("bad nonce: expected 4, got 3"),
            ErrorCategory::NonceConflict
        );
    }

    #[test]
    fn test_not_found() {
        assert_eq!(
            ErrorCategory::from_message("NoSuchContract"),
            ErrorCategory::NotFound
        );
    }

    #[test]
    fn test_fallback_is_provider() {
        assert_eq!(
            ErrorCategory::from_message("something exploded"),
            ErrorCategory::Provider
        );
    }
}
