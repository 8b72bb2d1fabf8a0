//! # StacksBuilder
//!
//! Backend for a developer-portfolio platform on the Stacks blockchain:
//! wallet session coordination, Clarity contract interaction for
//! on-chain developer profiles, and the local persistence that keeps
//! the UX coherent while transactions confirm.
//!
//! ## Modules
//!
//! - [`wallet`]: Provider registry, session resolution, connection lifecycle
//! - [`contract`]: Clarity codec, c32 addresses, read client, write path
//! - [`profile`]: Data model, validation, chain/cache reconciliation
//! - [`store`]: Tiered key-value persistence with expiry
//! - [`api`]: REST API server with Axum
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stacksbuilder::contract::{ContractClient, ContractConfig, Network};
//! use stacksbuilder::profile::ProfileReader;
//! use stacksbuilder::store::{MemoryStore, ProfileCache};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(ContractClient::new(ContractConfig::for_network(
//!         Network::Testnet,
//!     )));
//!     let cache = ProfileCache::new(Arc::new(MemoryStore::new()));
//!     let reader = ProfileReader::new(client, cache);
//!
//!     let lookup = reader
//!         .lookup("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM")
//!         .await;
//!     println!("{}", serde_json::to_string_pretty(&lookup)?);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod contract;
pub mod profile;
pub mod store;
pub mod wallet;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, ContractSection, LoggingConfig, StoreConfig};

pub use contract::{
    ClarityError, ClarityValue, ContractCall, ContractClient, ContractConfig, ContractError,
    ErrorCategory, Network, PrincipalData, ProfileContract, StacksAddress,
};

pub use profile::{
    validate_form, DeveloperProfile, FieldError, ProfileForm, ProfileLookup, ProfilePresence,
    ProfileReader, ProfileSource, ProfileStats, ReputationScore, ValidationLimits,
};

pub use store::{
    migrate_legacy_data, DraftMode, DraftStore, FileStore, KeyValueStore, MemoryStore,
    ProfileCache, StoreError, StoreResult, WalletPreferenceStore,
};

pub use wallet::{
    wallet_info, ConnectManager, ConnectedAccount, ProviderRegistry, SessionResolver,
    SigningLease, WalletError, WalletInfo, WalletKind, WalletProvider,
};
