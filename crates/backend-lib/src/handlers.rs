// ============================
// crates/backend-lib/src/handlers.rs
// ============================
//! HTTP handlers. Every protected handler consults the authorization
//! evaluator before touching the store and treats a negative verdict as
//! an immediate abort with the verdict's cause.
use crate::auth::{cookies, issuer, session, AuthRequest, Verdict, ACCESS_COOKIE, REFRESH_COOKIE};
use crate::error::AppError;
use crate::storage::UserStore;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use ledgerly_common::{ApiMessage, LoginRequest, RegisterRequest, Role, TokenPair, UserPublic};
use metrics::counter;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::info;

/// Response header signalling that the access token was silently renewed
pub const REFRESHED_TOKEN_HEADER: &str = "x-refreshed-token";

/// Handler for `POST /api/register`
pub async fn register<S: UserStore + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiMessage>), AppError> {
    let user = issuer::register(&state.store, &req, Role::Regular).await?;
    counter!(crate::metrics::USER_REGISTERED).increment(1);
    info!(username = %user.username, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiMessage {
            message: "User added successfully".to_string(),
        }),
    ))
}

/// Handler for `POST /api/admin` — the privileged registration path
pub async fn register_admin<S: UserStore + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiMessage>), AppError> {
    let user = issuer::register(&state.store, &req, Role::Admin).await?;
    counter!(crate::metrics::USER_REGISTERED).increment(1);
    info!(username = %user.username, "admin registered");

    Ok((
        StatusCode::CREATED,
        Json(ApiMessage {
            message: "Admin added successfully".to_string(),
        }),
    ))
}

/// Handler for `POST /api/login`
pub async fn login<S: UserStore + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<TokenPair>), AppError> {
    let ip = client_ip(&headers);
    if !state.login_limiter.check_rate_limit(ip) {
        return Err(AppError::AuthRateLimited);
    }

    let auth_cfg = &state.settings.auth;
    match issuer::login(&state.store, &state.codec, auth_cfg, &req).await {
        Ok(tokens) => {
            state.login_limiter.record_success(ip);
            counter!(crate::metrics::LOGIN_SUCCESS).increment(1);
            info!("login succeeded");

            let mut out = HeaderMap::new();
            append_cookie(
                &mut out,
                &cookies::auth_cookie(
                    ACCESS_COOKIE,
                    &tokens.access,
                    &auth_cfg.cookie_path,
                    auth_cfg.access_ttl_secs,
                ),
            )?;
            append_cookie(
                &mut out,
                &cookies::auth_cookie(
                    REFRESH_COOKIE,
                    &tokens.refresh,
                    &auth_cfg.cookie_path,
                    auth_cfg.refresh_ttl_secs,
                ),
            )?;

            Ok((
                out,
                Json(TokenPair {
                    access_token: tokens.access,
                    refresh_token: tokens.refresh,
                }),
            ))
        }
        Err(e @ (AppError::UserNotFound | AppError::BadCredentials)) => {
            state.login_limiter.record_failed_attempt(ip);
            counter!(crate::metrics::LOGIN_FAILURE).increment(1);
            Err(e)
        }
        Err(e) => Err(e),
    }
}

/// Handler for `POST /api/logout`
pub async fn logout<S: UserStore + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<ApiMessage>), AppError> {
    let pair = cookies::extract(&headers);
    session::logout(&state.store, pair.refresh.as_deref()).await?;
    counter!(crate::metrics::LOGOUT).increment(1);

    let path = &state.settings.auth.cookie_path;
    let mut out = HeaderMap::new();
    append_cookie(&mut out, &cookies::clear_cookie(ACCESS_COOKIE, path))?;
    append_cookie(&mut out, &cookies::clear_cookie(REFRESH_COOKIE, path))?;

    Ok((
        out,
        Json(ApiMessage {
            message: "Logged out".to_string(),
        }),
    ))
}

/// Handler for `GET /api/users` — Admin only
pub async fn get_users<S: UserStore + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<Vec<UserPublic>>), AppError> {
    let pair = cookies::extract(&headers);
    let verdict = state.authorizer.verify(&pair, &AuthRequest::Admin);
    if !verdict.authorized {
        counter!(crate::metrics::AUTH_DENIED).increment(1);
        return Err(AppError::Unauthorized(verdict.cause));
    }
    let out = renewal_headers(&state, &verdict)?;

    let users = state
        .store
        .list()
        .await?
        .into_iter()
        .map(|u| u.public())
        .collect();

    Ok((out, Json(users)))
}

/// Handler for `GET /api/users/{username}` — the user themselves, or an Admin
pub async fn get_user<S: UserStore + Send + Sync + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(username): Path<String>,
    headers: HeaderMap,
) -> Result<(HeaderMap, Json<UserPublic>), AppError> {
    let pair = cookies::extract(&headers);
    let as_user = state.authorizer.verify(
        &pair,
        &AuthRequest::User {
            username: username.clone(),
        },
    );
    let verdict = if as_user.authorized {
        as_user
    } else {
        state.authorizer.verify(&pair, &AuthRequest::Admin)
    };
    if !verdict.authorized {
        counter!(crate::metrics::AUTH_DENIED).increment(1);
        return Err(AppError::Unauthorized(verdict.cause));
    }
    let out = renewal_headers(&state, &verdict)?;

    let user = state
        .store
        .find_by_username(&username)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok((out, Json(user.public())))
}

/// Build the response headers for a successful verdict: when an access
/// token was silently renewed, set the replacement cookie and the refresh
/// notice header.
fn renewal_headers<S>(state: &AppState<S>, verdict: &Verdict) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    if let Some(token) = &verdict.renewed_access {
        let auth_cfg = &state.settings.auth;
        append_cookie(
            &mut headers,
            &cookies::auth_cookie(
                ACCESS_COOKIE,
                token,
                &auth_cfg.cookie_path,
                auth_cfg.access_ttl_secs,
            ),
        )?;
        headers.insert(
            REFRESHED_TOKEN_HEADER,
            HeaderValue::from_static("Access token refreshed"),
        );
        counter!(crate::metrics::TOKEN_RENEWED).increment(1);
    }
    Ok(headers)
}

fn append_cookie(headers: &mut HeaderMap, cookie: &str) -> Result<(), AppError> {
    let value =
        HeaderValue::from_str(cookie).map_err(|e| AppError::Internal(e.to_string()))?;
    headers.append(header::SET_COOKIE, value);
    Ok(())
}

fn client_ip(headers: &HeaderMap) -> IpAddr {
    headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.parse().ok())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]))
}
