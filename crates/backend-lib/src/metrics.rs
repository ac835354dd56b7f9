// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for Prometheus metric keys
pub const LOGIN_SUCCESS: &str = "auth.login.success";
pub const LOGIN_FAILURE: &str = "auth.login.failure";
pub const LOGIN_LOCKED_OUT: &str = "auth.login.locked_out";
pub const LOGOUT: &str = "auth.logout";
pub const USER_REGISTERED: &str = "auth.user.registered";
pub const TOKEN_RENEWED: &str = "auth.token.renewed";
pub const AUTH_DENIED: &str = "auth.denied";
