// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication and authorization core.

pub mod cookies;
pub mod evaluator;
pub mod issuer;
pub mod password;
pub mod rate_limit;
pub mod request;
pub mod session;
pub mod token;

pub use cookies::{ACCESS_COOKIE, REFRESH_COOKIE};
pub use evaluator::{Authorizer, CookiePair, Verdict};
pub use issuer::IssuedTokens;
pub use password::{hash_password, verify_password};
pub use rate_limit::AuthRateLimiter;
pub use request::AuthRequest;
pub use token::{Claims, DecodeError, TokenCodec};
