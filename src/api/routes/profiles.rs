//! Profile Routes
//!
//! Read-side profile endpoints. Responses carry the reconciliation
//! outcome explicitly so clients can distinguish "no profile" from
//! "chain unreachable, showing cached data".
//!
//! - GET /api/v1/profiles/:address - Profile lookup
//! - GET /api/v1/profiles/:address/exists - Existence check
//! - GET /api/v1/profiles/:address/stats - Aggregate stats
//! - GET /api/v1/stats/total - Total registered profiles

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ExistsResponse, TotalProfilesResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::contract::StacksAddress;
use crate::profile::{ProfileLookup, ProfilePresence, ProfileStats};

/// GET /api/v1/profiles/:address
///
/// Returns the tagged lookup outcome. Confirmed absence is a 404; an
/// unreachable chain is still a 200 so cached data can be served.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> ApiResult<Response> {
    let address = validate_address(&address)?;

    let lookup = state.reader.lookup(&address).await;
    let status = match &lookup {
        ProfileLookup::ConfirmedAbsent => StatusCode::NOT_FOUND,
        ProfileLookup::Confirmed { .. } | ProfileLookup::Unknown { .. } => StatusCode::OK,
    };
    Ok((status, Json(lookup)).into_response())
}

/// GET /api/v1/profiles/:address/exists
pub async fn profile_exists(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> ApiResult<Json<ExistsResponse>> {
    let address = validate_address(&address)?;

    let response = match state.reader.exists(&address).await {
        ProfilePresence::Present => ExistsResponse {
            exists: Some(true),
            cached: false,
        },
        ProfilePresence::Absent => ExistsResponse {
            exists: Some(false),
            cached: false,
        },
        ProfilePresence::Unknown { cached } => ExistsResponse {
            exists: None,
            cached,
        },
    };
    Ok(Json(response))
}

/// GET /api/v1/profiles/:address/stats
pub async fn get_profile_stats(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> ApiResult<Json<ProfileStats>> {
    let address = validate_address(&address)?;

    let stats = state
        .reader
        .stats(&address)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No stats for {address}")))?;
    Ok(Json(stats))
}

/// GET /api/v1/stats/total
pub async fn get_total_profiles(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<TotalProfilesResponse>> {
    let total = state.reader.total().await?;
    Ok(Json(TotalProfilesResponse { total }))
}

/// Reject malformed addresses before they reach the node, and return
/// the canonical form so cache keys stay consistent.
fn validate_address(address: &str) -> ApiResult<String> {
    StacksAddress::parse(address)
        .map(|a| a.to_c32())
        .map_err(|e| ApiError::Validation(format!("invalid Stacks address: {e}")))
}
