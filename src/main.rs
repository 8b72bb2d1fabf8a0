//! StacksBuilder API Server
//!
//! Run with: cargo run --bin stacksbuilder-api
//!
//! # Configuration
//!
//! Loaded from `config.toml` (see `stacksbuilder-cli config`) with
//! environment overrides:
//! - `STACKSBUILDER_NETWORK`: testnet or mainnet (default: testnet)
//! - `STACKSBUILDER_CORE_API_URL`: Stacks node base URL
//! - `STACKSBUILDER_CONTRACT_ADDRESS`: Contract deployer address
//! - `STACKSBUILDER_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `STACKSBUILDER_API_PORT`: Port to listen on (default: 8090)
//! - `STACKSBUILDER_DATA_DIR`: Persistent store directory
//! - `RUST_LOG`: Log filter (overrides the config's log level)

use anyhow::Context;
use stacksbuilder::api::{serve, AppState};
use stacksbuilder::config::Config;
use stacksbuilder::contract::ContractClient;
use stacksbuilder::store::{migrate_legacy_data, FileStore, ProfileCache};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    init_tracing(&config);

    tracing::info!(
        "Starting StacksBuilder API server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let contract_config = config.contract.resolve()?;
    tracing::info!(
        network = %contract_config.network,
        contract = %contract_config.contract_id(),
        node = %contract_config.core_api_url,
        "Contract target"
    );

    let store_path = config.store.store_path();
    tracing::info!("Persistent store: {:?}", store_path);
    let store = Arc::new(
        FileStore::open(&store_path)
            .with_context(|| format!("opening persistent store at {store_path:?}"))?,
    );

    // Older releases used flat ad hoc keys; move them over once
    match migrate_legacy_data(&*store, &*store, None) {
        Ok(0) => {}
        Ok(moved) => tracing::info!(moved, "Migrated legacy store keys"),
        Err(e) => tracing::warn!(error = %e, "Legacy store migration failed"),
    }

    let client = Arc::new(ContractClient::new(contract_config));
    let cache = ProfileCache::new(store);

    let state = AppState::new(client, cache, config.api.clone(), config.contract.clone());

    tracing::info!("Starting server on {}", config.api.addr());
    serve(state, &config.api).await?;

    tracing::info!("StacksBuilder API server stopped");
    Ok(())
}

/// Initialize tracing from the logging config; `RUST_LOG` wins when set.
fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("stacksbuilder={},tower_http=info", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
