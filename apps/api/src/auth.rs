//! Session authentication.
//!
//! Session issuance lives in the hosted auth layer; this module only resolves
//! the opaque token forwarded with each request. Every handler that mutates or
//! reads tenant data takes an [`AuthUser`] and filters its statements by the
//! extracted user id.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

const SESSION_COOKIE: &str = "session_token";

/// The authenticated user id, resolved from the request's session token.
/// Rejects with 401 before the handler body runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM sessions WHERE token = $1 AND expires_at > now()",
        )
        .bind(&token)
        .fetch_optional(&state.db)
        .await?;

        user_id.map(AuthUser).ok_or(AppError::Unauthorized)
    }
}

/// Pulls the session token from `Authorization: Bearer ...` or the
/// `session_token` cookie, in that order.
fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(bearer) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
    {
        if !bearer.is_empty() {
            return Some(bearer.to_string());
        }
    }

    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(cookie_value)
}

fn cookie_value(cookie_header: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_is_extracted() {
        let headers = headers_with(header::AUTHORIZATION, "Bearer abc123");
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_cookie_token_is_extracted() {
        let headers = headers_with(header::COOKIE, "theme=dark; session_token=tok42; lang=fr");
        assert_eq!(session_token(&headers).as_deref(), Some("tok42"));
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let mut headers = headers_with(header::AUTHORIZATION, "Bearer from-header");
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("session_token=from-cookie"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_missing_credentials_yield_none() {
        assert!(session_token(&HeaderMap::new()).is_none());
    }

    #[test]
    fn test_empty_bearer_and_empty_cookie_are_ignored() {
        let headers = headers_with(header::AUTHORIZATION, "Bearer ");
        assert!(session_token(&headers).is_none());

        let headers = headers_with(header::COOKIE, "session_token=");
        assert!(session_token(&headers).is_none());
    }
}
