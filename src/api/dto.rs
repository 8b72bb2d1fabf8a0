//! API Data Transfer Objects
//!
//! Request and response shapes for the HTTP API. Cookie DTOs use
//! camelCase field names to match the browser clients that call them.

use serde::{Deserialize, Serialize};

/// POST /api/cookies request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieCommand {
    /// "set" or "delete"
    pub action: String,
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub options: Option<CookieOptions>,
}

/// Cookie attributes accepted on `set`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieOptions {
    /// Lifetime in days
    #[serde(default)]
    pub expires: Option<i64>,
    #[serde(default)]
    pub http_only: Option<bool>,
    #[serde(default)]
    pub secure: Option<bool>,
    /// "Strict", "Lax", or "None"
    #[serde(default)]
    pub same_site: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
}

/// POST /api/cookies response body
#[derive(Debug, Serialize)]
pub struct CookieWriteResponse {
    pub success: bool,
}

/// GET /api/cookies?name= response body
#[derive(Debug, Serialize)]
pub struct CookieReadResponse {
    pub name: String,
    pub value: Option<String>,
    pub exists: bool,
}

/// GET /api/v1/profiles/:address/exists response body
#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    /// `true`/`false` when the chain answered, `null` when unreachable
    pub exists: Option<bool>,
    /// Whether a local created-marker exists for the address
    pub cached: bool,
}

/// GET /api/v1/stats/total response body
#[derive(Debug, Serialize)]
pub struct TotalProfilesResponse {
    pub total: u64,
}

/// GET /health response body
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub chain: String,
    pub network: String,
    pub uptime_seconds: u64,
    pub version: String,
}
