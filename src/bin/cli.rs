//! StacksBuilder CLI
//!
//! Command-line interface for profile operations:
//! - Check whether an address has a profile
//! - Fetch a profile or its stats
//! - Show the total number of registered profiles
//! - Purge locally cached data for an address

use clap::{Parser, Subcommand};
use stacksbuilder::config::{generate_default_config, Config};
use stacksbuilder::contract::{ContractClient, ContractConfig, Network, StacksAddress};
use stacksbuilder::profile::{ProfileLookup, ProfilePresence, ProfileReader};
use stacksbuilder::store::{FileStore, ProfileCache};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "stacksbuilder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Developer profiles on the Stacks blockchain")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Stacks network (testnet, mainnet)
    #[arg(long, default_value = "testnet", global = true)]
    pub network: String,

    /// Stacks node base URL (defaults to the public Hiro endpoint)
    #[arg(long, global = true)]
    pub core_api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether an address has a profile
    Exists {
        /// c32check Stacks address
        address: String,
    },

    /// Fetch a profile
    Get {
        /// c32check Stacks address
        address: String,
    },

    /// Fetch aggregate profile stats
    Stats {
        /// c32check Stacks address
        address: String,
    },

    /// Show the total number of registered profiles
    Total,

    /// Purge locally cached data for an address
    Purge {
        /// c32check Stacks address
        address: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Wrote default config to {:?}", path);
                }
                None => print!("{content}"),
            }
            return Ok(());
        }

        Commands::Purge { address } => {
            let address = parse_address(&address);
            let store_path = Config::load_default().store.store_path();
            let store = Arc::new(FileStore::open(&store_path)?);
            ProfileCache::new(store).delete_all(&address)?;
            println!("Purged local data for {address}");
            return Ok(());
        }

        ref command => {
            let reader = build_reader(&cli)?;
            match command {
                Commands::Exists { address } => {
                    let address = parse_address(address);
                    match reader.exists(&address).await {
                        ProfilePresence::Present => println!("{address}: profile exists"),
                        ProfilePresence::Absent => println!("{address}: no profile"),
                        ProfilePresence::Unknown { cached } => {
                            println!(
                                "{address}: chain unreachable (local marker: {})",
                                if cached { "present" } else { "absent" }
                            );
                        }
                    }
                }

                Commands::Get { address } => {
                    let address = parse_address(address);
                    let lookup = reader.lookup(&address).await;
                    if let ProfileLookup::ConfirmedAbsent = lookup {
                        eprintln!("No profile for {address}");
                        std::process::exit(1);
                    }
                    println!("{}", serde_json::to_string_pretty(&lookup)?);
                }

                Commands::Stats { address } => {
                    let address = parse_address(address);
                    match reader.stats(&address).await? {
                        Some(stats) => println!("{}", serde_json::to_string_pretty(&stats)?),
                        None => {
                            eprintln!("No stats for {address}");
                            std::process::exit(1);
                        }
                    }
                }

                Commands::Total => {
                    println!("{}", reader.total().await?);
                }

                _ => unreachable!("handled above"),
            }
        }
    }

    Ok(())
}

/// Build a reader against the requested network, cached through the
/// same persistent store the server uses.
fn build_reader(cli: &Cli) -> anyhow::Result<ProfileReader> {
    let network: Network = match cli.network.parse() {
        Ok(network) => network,
        Err(_) => {
            eprintln!("Invalid network: {} (expected testnet or mainnet)", cli.network);
            std::process::exit(1);
        }
    };

    let mut config = ContractConfig::for_network(network);
    if let Some(url) = &cli.core_api_url {
        config.core_api_url = url.trim_end_matches('/').to_string();
    }

    let store_path = Config::load_default().store.store_path();
    let store = Arc::new(FileStore::open(&store_path)?);
    Ok(ProfileReader::new(
        Arc::new(ContractClient::new(config)),
        ProfileCache::new(store),
    ))
}

fn parse_address(address: &str) -> String {
    match StacksAddress::parse(address) {
        Ok(parsed) => parsed.to_c32(),
        Err(e) => {
            eprintln!("Invalid Stacks address: {e}");
            std::process::exit(1);
        }
    }
}
