//! Contract Interaction
//!
//! Clarity value codec, c32 addresses, the read-only HTTP client, and
//! the wallet-signed write path for the developer-profiles contract.

pub mod c32;
mod clarity;
mod client;
mod error;
mod profiles;

pub use c32::StacksAddress;
pub use clarity::{ClarityError, ClarityValue, PrincipalData};
pub use client::{ContractClient, ContractConfig, Network};
pub use error::{ContractError, ErrorCategory};
pub use profiles::{ContractCall, ProfileContract};
