//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::contract::{ContractConfig, Network};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub contract: ContractSection,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Profile contract and Stacks node settings
#[derive(Debug, Clone, Deserialize)]
pub struct ContractSection {
    #[serde(default = "default_network")]
    pub network: String,

    /// Overrides the public Hiro endpoint for the network
    pub core_api_url: Option<String>,

    /// Overrides the default deployer address for the network
    pub contract_address: Option<String>,

    #[serde(default = "default_contract_name")]
    pub contract_name: String,

    #[serde(default = "default_contract_timeout")]
    pub timeout_secs: u64,
}

fn default_network() -> String {
    "testnet".to_string()
}

fn default_contract_name() -> String {
    "developer-profiles-v2".to_string()
}

fn default_contract_timeout() -> u64 {
    15
}

impl Default for ContractSection {
    fn default() -> Self {
        Self {
            network: default_network(),
            core_api_url: None,
            contract_address: None,
            contract_name: default_contract_name(),
            timeout_secs: default_contract_timeout(),
        }
    }
}

impl ContractSection {
    /// Resolve the section into a usable [`ContractConfig`].
    pub fn resolve(&self) -> Result<ContractConfig, ConfigError> {
        let network: Network = self
            .network
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown network: {}", self.network)))?;

        let mut config = ContractConfig::for_network(network);
        if let Some(url) = &self.core_api_url {
            config.core_api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(address) = &self.contract_address {
            config.contract_address = address.clone();
            config.sender = address.clone();
        }
        config.contract_name = self.contract_name.clone();
        config.timeout_secs = self.timeout_secs;
        Ok(config)
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Persistent store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("stacksbuilder").to_string_lossy().to_string())
        .unwrap_or_else(|| "./stacksbuilder_data".to_string())
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StoreConfig {
    /// Path of the persistent key-value store file.
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("store.json")
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("stacksbuilder").join("config.toml")),
            Some(PathBuf::from("/etc/stacksbuilder/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Contract overrides
        if let Ok(network) = std::env::var("STACKSBUILDER_NETWORK") {
            self.contract.network = network;
        }
        if let Ok(url) = std::env::var("STACKSBUILDER_CORE_API_URL") {
            self.contract.core_api_url = Some(url);
        }
        if let Ok(address) = std::env::var("STACKSBUILDER_CONTRACT_ADDRESS") {
            self.contract.contract_address = Some(address);
        }

        // API overrides
        if let Ok(host) = std::env::var("STACKSBUILDER_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("STACKSBUILDER_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        // Store overrides
        if let Ok(data_dir) = std::env::var("STACKSBUILDER_DATA_DIR") {
            self.store.data_dir = data_dir;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("STACKSBUILDER_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("STACKSBUILDER_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contract: ContractSection::default(),
            api: ApiConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# StacksBuilder Configuration
#
# Environment variables override these settings:
# - STACKSBUILDER_NETWORK
# - STACKSBUILDER_CORE_API_URL
# - STACKSBUILDER_CONTRACT_ADDRESS
# - STACKSBUILDER_API_HOST
# - STACKSBUILDER_API_PORT
# - STACKSBUILDER_DATA_DIR
# - STACKSBUILDER_LOG_LEVEL
# - STACKSBUILDER_LOG_FORMAT

[contract]
# Stacks network: testnet or mainnet
network = "testnet"

# Stacks node base URL (defaults to the public Hiro endpoint)
# core_api_url = "https://api.testnet.hiro.so"

# Contract deployer address (defaults to the known deployer for the network)
# contract_address = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM"

# Contract name
contract_name = "developer-profiles-v2"

# Read-only call timeout in seconds
timeout_secs = 15

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8090

# Allowed CORS origins
cors_origins = ["http://localhost:3000", "http://127.0.0.1:3000"]

# Request timeout in seconds
request_timeout_secs = 30

[store]
# Directory for the persistent key-value store
data_dir = "~/.local/share/stacksbuilder"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/stacksbuilder/stacksbuilder.log"
"#
    .to_string()
}
