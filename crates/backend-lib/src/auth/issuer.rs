// ============================
// crates/backend-lib/src/auth/issuer.rs
// ============================
//! Credential issuance: registration and login.
use super::password::{hash_password, verify_password};
use super::token::{Claims, TokenCodec};
use crate::config::AuthSettings;
use crate::error::AppError;
use crate::storage::{UserRecord, UserStore};
use ledgerly_common::{LoginRequest, RegisterRequest, Role};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

// basic local@domain.tld shape; full RFC validation is not the goal
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// The token pair minted at login. The refresh token is also persisted on
/// the user record; the access token exists only in the response.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access: String,
    pub refresh: String,
}

/// Register a new user with the given role. `Role::Admin` is reachable
/// only through the privileged registration endpoint.
pub async fn register<S: UserStore + ?Sized>(
    store: &S,
    req: &RegisterRequest,
    role: Role,
) -> Result<UserRecord, AppError> {
    let username = req.username.trim();
    let email = req.email.trim();

    if username.is_empty() {
        return Err(AppError::MissingField("username"));
    }
    if email.is_empty() {
        return Err(AppError::MissingField("email"));
    }
    if req.password.trim().is_empty() {
        return Err(AppError::MissingField("password"));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::InvalidInput(
            "username may only contain letters, digits, '-' and '_'".to_string(),
        ));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::InvalidEmail);
    }

    if store.find_by_username(username).await?.is_some() {
        return Err(AppError::InvalidInput("username already taken".to_string()));
    }
    if store.find_by_email(email).await?.is_some() {
        return Err(AppError::InvalidInput(
            "email already registered".to_string(),
        ));
    }

    let user = UserRecord {
        id: Uuid::new_v4().to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: hash_password(&req.password)?,
        role,
        refresh_token: None,
    };
    store.save(&user).await?;
    Ok(user)
}

/// Authenticate by email and password; on success mint the dual token
/// pair and persist the refresh token on the user record, superseding any
/// previously issued one.
pub async fn login<S: UserStore + ?Sized>(
    store: &S,
    codec: &TokenCodec,
    settings: &AuthSettings,
    req: &LoginRequest,
) -> Result<IssuedTokens, AppError> {
    let email = req.email.trim();
    if email.is_empty() {
        return Err(AppError::MissingField("email"));
    }
    if req.password.trim().is_empty() {
        return Err(AppError::MissingField("password"));
    }
    if !EMAIL_RE.is_match(email) {
        return Err(AppError::InvalidEmail);
    }

    let mut user = store
        .find_by_email(email)
        .await?
        .ok_or(AppError::UserNotFound)?;

    if !verify_password(&user.password_hash, &req.password) {
        return Err(AppError::BadCredentials);
    }

    let claims = Claims::for_user(&user);
    let access = codec.encode(&claims, settings.access_ttl())?;
    let refresh = codec.encode(&claims, settings.refresh_ttl())?;

    // the only mutation performed at login: last issued refresh token wins
    user.refresh_token = Some(refresh.clone());
    store.save(&user).await?;

    Ok(IssuedTokens { access, refresh })
}
