// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the Ledgerly finance tracker server.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod storage;

use crate::auth::{AuthRateLimiter, Authorizer, TokenCodec};
use crate::config::Settings;
use crate::storage::UserStore;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState<S> {
    /// User storage backend
    pub store: S,
    /// Token codec holding the signing secret
    pub codec: Arc<TokenCodec>,
    /// Authorization evaluator
    pub authorizer: Authorizer,
    /// Settings manager
    pub settings: Arc<Settings>,
    /// Per-IP login rate limiter
    pub login_limiter: AuthRateLimiter,
}

impl<S: UserStore> AppState<S> {
    /// Create a new application state. The signing secret is taken from
    /// the settings and injected into the codec; nothing reads it from
    /// ambient state afterwards.
    pub fn new(store: S, settings: Settings) -> Self {
        let codec = Arc::new(TokenCodec::new(settings.auth.secret.as_bytes()));
        let authorizer = Authorizer::new(Arc::clone(&codec), settings.auth.access_ttl());

        Self {
            store,
            codec,
            authorizer,
            settings: Arc::new(settings),
            login_limiter: AuthRateLimiter::default(),
        }
    }
}
