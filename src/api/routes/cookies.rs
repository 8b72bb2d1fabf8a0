//! Cookie Routes
//!
//! Server-side cookie management for browser clients.
//!
//! - POST /api/cookies - Set or delete a cookie via `Set-Cookie`
//! - GET /api/cookies?name= - Read a cookie from the request
//!
//! The endpoint is stateless: it only translates commands into cookie
//! headers. Values are percent-encoded on the wire so arbitrary strings
//! survive the cookie grammar.

use axum::{
    extract::Query,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::api::dto::{CookieCommand, CookieOptions, CookieReadResponse, CookieWriteResponse};
use crate::api::error::{ApiError, ApiResult};

/// Default cookie lifetime when the client does not specify one.
const DEFAULT_EXPIRES_DAYS: i64 = 30;

/// POST /api/cookies
///
/// `{"action":"set","name":...,"value":...,"options":{...}}` emits a
/// `Set-Cookie` header; `{"action":"delete","name":...}` emits an
/// immediately-expiring one.
pub async fn write_cookie(Json(cmd): Json<CookieCommand>) -> ApiResult<Response> {
    validate_cookie_name(&cmd.name)?;

    let header_value = match cmd.action.as_str() {
        "set" => {
            let value = cmd
                .value
                .as_deref()
                .ok_or_else(|| ApiError::Validation("'set' requires a value".to_string()))?;
            build_set_cookie(&cmd.name, value, &cmd.options.unwrap_or_default())?
        }
        "delete" => build_delete_cookie(&cmd.name),
        other => {
            return Err(ApiError::Validation(format!(
                "unknown action '{other}', expected 'set' or 'delete'"
            )))
        }
    };

    tracing::debug!(name = %cmd.name, action = %cmd.action, "Cookie command");
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, header_value)],
        Json(CookieWriteResponse { success: true }),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct ReadCookieQuery {
    pub name: String,
}

/// GET /api/cookies?name=
///
/// Reads the named cookie from the request's `Cookie` header.
pub async fn read_cookie(
    Query(query): Query<ReadCookieQuery>,
    headers: HeaderMap,
) -> ApiResult<Json<CookieReadResponse>> {
    validate_cookie_name(&query.name)?;

    let value = headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|raw| find_cookie(raw, &query.name));

    Ok(Json(CookieReadResponse {
        exists: value.is_some(),
        name: query.name,
        value,
    }))
}

fn build_set_cookie(name: &str, value: &str, options: &CookieOptions) -> ApiResult<String> {
    let max_age_days = options.expires.unwrap_or(DEFAULT_EXPIRES_DAYS);
    if max_age_days <= 0 {
        return Err(ApiError::Validation(
            "expires must be a positive number of days".to_string(),
        ));
    }

    let mut cookie = format!(
        "{name}={}; Path={}; Max-Age={}",
        urlencoding::encode(value),
        options.path.as_deref().unwrap_or("/"),
        max_age_days * 86_400,
    );

    match options
        .same_site
        .as_deref()
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        None | Some("lax") => cookie.push_str("; SameSite=Lax"),
        Some("strict") => cookie.push_str("; SameSite=Strict"),
        // SameSite=None is only honored on secure cookies
        Some("none") => cookie.push_str("; SameSite=None; Secure"),
        Some(other) => {
            return Err(ApiError::Validation(format!(
                "invalid sameSite value '{other}'"
            )))
        }
    }

    if options.http_only.unwrap_or(true) {
        cookie.push_str("; HttpOnly");
    }
    if options.secure.unwrap_or(false) && !cookie.ends_with("; Secure") {
        cookie.push_str("; Secure");
    }
    if let Some(domain) = &options.domain {
        cookie.push_str("; Domain=");
        cookie.push_str(domain);
    }

    Ok(cookie)
}

fn build_delete_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0; SameSite=Lax; HttpOnly")
}

/// Cookie names must be RFC 6265 tokens; anything else risks header
/// injection through the name.
fn validate_cookie_name(name: &str) -> ApiResult<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(ApiError::Validation(format!("invalid cookie name {name:?}")))
    }
}

fn find_cookie(header_value: &str, name: &str) -> Option<String> {
    header_value.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        if key.trim() == name {
            Some(
                urlencoding::decode(value.trim())
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| value.trim().to_string()),
            )
        } else {
            None
        }
    })
}
