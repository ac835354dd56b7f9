// ============================
// crates/backend-lib/src/auth/token.rs
// ============================
//! Signed, time-limited token encoding and decoding.
use crate::storage::UserRecord;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use ledgerly_common::Role;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims payload carried by both the access and the refresh token.
///
/// Identity fields default to empty strings on decode; whether they are
/// populated is a policy question for the authorization evaluator, not a
/// structural failure of the token itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build the claims for a user record. `iat`/`exp` are stamped by the
    /// codec at encode time.
    pub fn for_user(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role.to_string(),
            iat: 0,
            exp: 0,
        }
    }

    /// True iff username, email and role are all present and non-empty.
    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.email.is_empty() && !self.role.is_empty()
    }

    /// True iff the identity fields of two decoded payloads are pairwise equal.
    pub fn same_identity(&self, other: &Claims) -> bool {
        self.username == other.username && self.email == other.email && self.role == other.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin.as_str()
    }
}

/// Token decode failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Signature and structure are fine but the token is past its expiry
    #[error("TokenExpiredError")]
    Expired,

    /// Malformed token or signature verification failure. Carries the
    /// underlying error identifier, surfaced verbatim to callers.
    #[error("{0}")]
    Invalid(String),
}

/// Encodes and decodes signed claims tokens with an injected secret.
/// HS256, expiry checked with zero leeway.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Produce a signed token embedding `claims` with expiry `now + ttl`.
    pub fn encode(&self, claims: &Claims, ttl: Duration) -> anyhow::Result<String> {
        let now = Utc::now();
        let mut stamped = claims.clone();
        stamped.iat = now.timestamp();
        stamped.exp = (now + ttl).timestamp();

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &stamped,
            &self.encoding,
        )?)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn decode(&self, token: &str) -> Result<Claims, DecodeError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => DecodeError::Expired,
                kind => DecodeError::Invalid(kind_name(kind)),
            })
    }
}

/// Short identifier for a decode failure, e.g. `InvalidSignature`.
fn kind_name(kind: &ErrorKind) -> String {
    let debug = format!("{kind:?}");
    match debug.find('(') {
        Some(idx) => debug[..idx].to_string(),
        None => debug,
    }
}
