//! Read-only contract calls against a Stacks node.

use super::{ClarityValue, ContractError};
use crate::profile::{DeveloperProfile, ProfileSource, ProfileStats};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which Stacks network the app talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Testnet,
    Mainnet,
}

impl Network {
    pub fn core_api_url(&self) -> &'static str {
        match self {
            Self::Testnet => "https://api.testnet.hiro.so",
            Self::Mainnet => "https://api.hiro.so",
        }
    }

    /// Address the profile contract is deployed under.
    pub fn default_deployer(&self) -> &'static str {
        match self {
            Self::Testnet => "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM",
            Self::Mainnet => "SP1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Testnet => f.write_str("testnet"),
            Self::Mainnet => f.write_str("mainnet"),
        }
    }
}

impl FromStr for Network {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "testnet" => Ok(Self::Testnet),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(ContractError::Request(format!("unknown network: {other}"))),
        }
    }
}

/// Where the profile contract lives and how to reach the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    pub network: Network,
    /// Node base URL; defaults to the public Hiro endpoint for the
    /// network.
    pub core_api_url: String,
    pub contract_address: String,
    pub contract_name: String,
    /// Sender principal reported on read-only calls. Read-only calls
    /// are unsigned, so this never needs a key.
    pub sender: String,
    pub timeout_secs: u64,
}

impl ContractConfig {
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            core_api_url: network.core_api_url().to_string(),
            contract_address: network.default_deployer().to_string(),
            contract_name: "developer-profiles-v2".to_string(),
            sender: network.default_deployer().to_string(),
            timeout_secs: 15,
        }
    }

    /// Fully-qualified contract identifier, `ADDR.name`.
    pub fn contract_id(&self) -> String {
        format!("{}.{}", self.contract_address, self.contract_name)
    }
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self::for_network(Network::Testnet)
    }
}

#[derive(Serialize)]
struct ReadCallRequest {
    sender: String,
    arguments: Vec<String>,
}

#[derive(Deserialize)]
struct ReadCallResponse {
    okay: bool,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    cause: Option<String>,
}

/// HTTP client for the node's read-only call endpoint.
pub struct ContractClient {
    http: reqwest::Client,
    config: ContractConfig,
}

impl ContractClient {
    pub fn new(config: ContractConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { http, config }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Invoke a read-only function and decode its Clarity result.
    pub async fn call_read(
        &self,
        function: &str,
        args: &[ClarityValue],
    ) -> Result<ClarityValue, ContractError> {
        let url = format!(
            "{}/v2/contracts/call-read/{}/{}/{}",
            self.config.core_api_url,
            self.config.contract_address,
            self.config.contract_name,
            function
        );
        let body = ReadCallRequest {
            sender: self.config.sender.clone(),
            arguments: args.iter().map(|a| a.to_hex()).collect(),
        };

        tracing::debug!(%url, function, "Read-only contract call");
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContractError::Request(format!(
                "node returned {status} for {function}"
            )));
        }

        let parsed: ReadCallResponse = response.json().await.map_err(map_reqwest_error)?;
        if !parsed.okay {
            return Err(ContractError::CallFailed(
                parsed.cause.unwrap_or_else(|| "unspecified".to_string()),
            ));
        }

        let hex = parsed.result.ok_or_else(|| {
            ContractError::UnexpectedResponse("okay response without result".to_string())
        })?;
        Ok(ClarityValue::from_hex(&hex)?)
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ContractError {
    if e.is_timeout() {
        ContractError::Timeout
    } else if e.is_connect() {
        ContractError::Unreachable
    } else {
        ContractError::Request(e.to_string())
    }
}

#[async_trait]
impl ProfileSource for ContractClient {
    async fn profile_exists(&self, address: &str) -> Result<bool, ContractError> {
        let arg = ClarityValue::standard_principal(address)?;
        let value = self.call_read("profile-exists", &[arg]).await?;
        expect_bool(&value)
    }

    async fn fetch_profile(
        &self,
        address: &str,
    ) -> Result<Option<DeveloperProfile>, ContractError> {
        let arg = ClarityValue::standard_principal(address)?;
        let value = self.call_read("get-profile", &[arg]).await?;
        match expect_optional(&value)? {
            None => Ok(None),
            Some(tuple) => Ok(Some(decode_profile(address, tuple)?)),
        }
    }

    async fn fetch_stats(&self, address: &str) -> Result<Option<ProfileStats>, ContractError> {
        let arg = ClarityValue::standard_principal(address)?;
        let value = self.call_read("get-profile-stats", &[arg]).await?;
        match expect_optional(&value)? {
            None => Ok(None),
            Some(tuple) => Ok(Some(decode_stats(tuple)?)),
        }
    }

    async fn total_profiles(&self) -> Result<u64, ContractError> {
        let value = self.call_read("get-total-profiles", &[]).await?;
        let count = unwrap_response(&value)
            .as_u128()
            .ok_or_else(|| shape_error("uint", &value))?;
        Ok(count.min(u64::MAX as u128) as u64)
    }
}

/// Strip an `(ok ...)` wrapper if the function returns a response type.
fn unwrap_response(value: &ClarityValue) -> &ClarityValue {
    match value.as_response() {
        Some(Ok(inner)) => inner,
        _ => value,
    }
}

fn expect_bool(value: &ClarityValue) -> Result<bool, ContractError> {
    unwrap_response(value)
        .as_bool()
        .ok_or_else(|| shape_error("bool", value))
}

fn expect_optional(value: &ClarityValue) -> Result<Option<&ClarityValue>, ContractError> {
    unwrap_response(value)
        .as_optional()
        .ok_or_else(|| shape_error("optional", value))
}

fn shape_error(expected: &str, got: &ClarityValue) -> ContractError {
    ContractError::UnexpectedResponse(format!("expected {expected}, got {got:?}"))
}

/// Decode the contract's profile tuple. Missing fields fall back to
/// defaults so newer clients keep reading older contract versions.
pub(crate) fn decode_profile(
    address: &str,
    tuple: &ClarityValue,
) -> Result<DeveloperProfile, ContractError> {
    if !matches!(tuple, ClarityValue::Tuple(_)) {
        return Err(shape_error("tuple", tuple));
    }

    let mut profile = DeveloperProfile::new(
        address,
        ascii_field(tuple, "display-name"),
        ascii_field(tuple, "bio"),
    );
    profile.location = ascii_field(tuple, "location");
    profile.website = ascii_field(tuple, "website");
    profile.github_username = ascii_field(tuple, "github-username");
    profile.twitter_username = ascii_field(tuple, "twitter-username");
    profile.linkedin_username = ascii_field(tuple, "linkedin-username");
    profile.skills = list_field(tuple, "skills");
    profile.specialties = list_field(tuple, "specialties");
    profile.is_verified = tuple
        .tuple_get("is-verified")
        .and_then(ClarityValue::as_bool)
        .unwrap_or(false);
    profile.joined_at = uint_field(tuple, "joined-at").unwrap_or(profile.joined_at);
    profile.last_active = uint_field(tuple, "last-active").unwrap_or(profile.last_active);
    Ok(profile)
}

fn decode_stats(tuple: &ClarityValue) -> Result<ProfileStats, ContractError> {
    if !matches!(tuple, ClarityValue::Tuple(_)) {
        return Err(shape_error("tuple", tuple));
    }
    Ok(ProfileStats {
        reputation_score: uint_field(tuple, "reputation-score").unwrap_or(0) as u64,
        endorsements_received: uint_field(tuple, "endorsements-received").unwrap_or(0) as u64,
        projects_count: uint_field(tuple, "projects-count").unwrap_or(0) as u64,
        contributions_count: uint_field(tuple, "contributions-count").unwrap_or(0) as u64,
    })
}

fn ascii_field(tuple: &ClarityValue, name: &str) -> String {
    tuple
        .tuple_get(name)
        .and_then(ClarityValue::as_str)
        .unwrap_or_default()
        .to_string()
}

fn list_field(tuple: &ClarityValue, name: &str) -> Vec<String> {
    tuple
        .tuple_get(name)
        .and_then(ClarityValue::as_list)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn uint_field(tuple: &ClarityValue, name: &str) -> Option<i64> {
    tuple
        .tuple_get(name)
        .and_then(ClarityValue::as_u128)
        .map(|v| v.min(i64::MAX as u128) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

    fn profile_tuple() -> ClarityValue {
        ClarityValue::tuple(vec![
            ("display-name", ClarityValue::string_ascii("Alice").unwrap()),
            ("bio", ClarityValue::string_ascii("Clarity dev").unwrap()),
            ("location", ClarityValue::string_ascii("Lisbon").unwrap()),
            (
                "github-username",
                ClarityValue::string_ascii("alice-dev").unwrap(),
            ),
            (
                "skills",
                ClarityValue::List(vec![
                    ClarityValue::string_ascii("Clarity Smart Contracts").unwrap(),
                    ClarityValue::string_ascii("Rust").unwrap(),
                ]),
            ),
            ("is-verified", ClarityValue::Bool(true)),
            ("joined-at", ClarityValue::UInt(1_700_000_000)),
            ("last-active", ClarityValue::UInt(1_700_100_000)),
        ])
        .unwrap()
    }

    #[test]
    fn test_decode_profile_fields() {
        let profile = decode_profile(ADDR, &profile_tuple()).unwrap();
        assert_eq!(profile.address, ADDR);
        assert_eq!(profile.display_name, "Alice");
        assert_eq!(profile.location, "Lisbon");
        assert_eq!(profile.github_username, "alice-dev");
        assert_eq!(profile.skills, vec!["Clarity Smart Contracts", "Rust"]);
        assert!(profile.is_verified);
        assert_eq!(profile.joined_at, 1_700_000_000);
    }

    #[test]
    fn test_decode_profile_missing_fields_default() {
        let minimal = ClarityValue::tuple(vec![(
            "display-name",
            ClarityValue::string_ascii("Bob").unwrap(),
        )])
        .unwrap();
        let profile = decode_profile(ADDR, &minimal).unwrap();
        assert_eq!(profile.display_name, "Bob");
        assert!(profile.bio.is_empty());
        assert!(profile.skills.is_empty());
        assert!(!profile.is_verified);
    }

    #[test]
    fn test_decode_profile_rejects_non_tuple() {
        assert!(decode_profile(ADDR, &ClarityValue::Bool(true)).is_err());
    }

    #[test]
    fn test_expect_bool_unwraps_ok() {
        let wrapped = ClarityValue::ok(ClarityValue::Bool(true));
        assert!(expect_bool(&wrapped).unwrap());
        assert!(!expect_bool(&ClarityValue::Bool(false)).unwrap());
        assert!(expect_bool(&ClarityValue::UInt(1)).is_err());
    }

    #[test]
    fn test_expect_optional_shapes() {
        assert!(expect_optional(&ClarityValue::OptionalNone)
            .unwrap()
            .is_none());
        let some = ClarityValue::some(ClarityValue::UInt(3));
        assert!(expect_optional(&some).unwrap().is_some());
        assert!(expect_optional(&ClarityValue::UInt(3)).is_err());
    }

    #[test]
    fn test_decode_stats() {
        let tuple = ClarityValue::tuple(vec![
            ("reputation-score", ClarityValue::UInt(42)),
            ("endorsements-received", ClarityValue::UInt(7)),
            ("projects-count", ClarityValue::UInt(3)),
            ("contributions-count", ClarityValue::UInt(19)),
        ])
        .unwrap();
        let stats = decode_stats(&tuple).unwrap();
        assert_eq!(stats.reputation_score, 42);
        assert_eq!(stats.contributions_count, 19);
    }

    #[test]
    fn test_network_parsing() {
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!(" Mainnet ".parse::<Network>().unwrap(), Network::Mainnet);
        assert!("devnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_contract_id() {
        let config = ContractConfig::for_network(Network::Testnet);
        assert_eq!(
            config.contract_id(),
            format!("{}.developer-profiles-v2", Network::Testnet.default_deployer())
        );
    }
}
