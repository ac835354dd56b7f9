// ============================
// crates/backend-lib/src/router.rs
// ============================
//! HTTP router wiring.
use crate::handlers;
use crate::storage::UserStore;
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the API router
pub fn create_router<S: UserStore + Send + Sync + 'static>(state: Arc<AppState<S>>) -> Router {
    Router::new()
        .route("/api/register", post(handlers::register::<S>))
        .route("/api/admin", post(handlers::register_admin::<S>))
        .route("/api/login", post(handlers::login::<S>))
        .route("/api/logout", post(handlers::logout::<S>))
        .route("/api/users", get(handlers::get_users::<S>))
        .route("/api/users/{username}", get(handlers::get_user::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
