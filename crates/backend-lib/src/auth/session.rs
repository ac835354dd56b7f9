// ============================
// crates/backend-lib/src/auth/session.rs
// ============================
//! Session teardown: refresh-token invalidation at logout.
use crate::error::AppError;
use crate::storage::UserStore;

/// Invalidate the session identified by the `refreshToken` cookie value.
///
/// The stored refresh token is nulled so renewal is blocked from this
/// point on. Outstanding access tokens stay valid until natural expiry;
/// there is no server-side access-token revocation.
pub async fn logout<S: UserStore + ?Sized>(
    store: &S,
    refresh_cookie: Option<&str>,
) -> Result<(), AppError> {
    let token = refresh_cookie
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingToken)?;

    let mut user = store
        .find_by_refresh_token(token)
        .await?
        .ok_or(AppError::UserNotFound)?;

    user.refresh_token = None;
    store.save(&user).await?;
    Ok(())
}
