// ================
// common/src/lib.rs
// ================
//! Common types and structures
//! shared between the Ledgerly client and server.
//! This module defines the HTTP request/response bodies and supporting types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role assigned to a user at registration, fixed afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Regular,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Regular => "Regular",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/register` and `POST /api/admin`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Successful login response. The same tokens are also set as cookies;
/// clients may use either.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Public view of a user record, never carries credentials.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserPublic {
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// Generic confirmation payload (logout, registration).
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiMessage {
    pub message: String,
}
