// ============================
// crates/backend-lib/src/auth/cookies.rs
// ============================
//! Auth cookie construction and extraction.
use super::evaluator::CookiePair;
use axum::http::{header, HeaderMap};
use cookie::{time::Duration, Cookie, SameSite};

/// Cookie carrying the short-lived access token
pub const ACCESS_COOKIE: &str = "accessToken";
/// Cookie carrying the long-lived refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Build an auth cookie: httpOnly, Secure, SameSite=None, scoped to the
/// API path, maxAge equal to the token's TTL.
pub fn auth_cookie(name: &str, value: &str, path: &str, max_age_secs: i64) -> String {
    Cookie::build((name.to_string(), value.to_string()))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path(path.to_string())
        .max_age(Duration::seconds(max_age_secs))
        .build()
        .to_string()
}

/// Build a clearing cookie (empty value, maxAge=0).
pub fn clear_cookie(name: &str, path: &str) -> String {
    auth_cookie(name, "", path, 0)
}

/// Extract the two auth cookie values from a request's `Cookie` header.
pub fn extract(headers: &HeaderMap) -> CookiePair {
    let raw = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let mut pair = CookiePair::default();
    for cookie in Cookie::split_parse(raw).flatten() {
        match cookie.name() {
            ACCESS_COOKIE => pair.access = Some(cookie.value().to_string()),
            REFRESH_COOKIE => pair.refresh = Some(cookie.value().to_string()),
            _ => {}
        }
    }
    pair
}
