//! Route handlers organized by resource

pub mod follows;
pub mod health;
pub mod posts;
pub mod users;

use std::sync::Arc;

use axum::Router;

use super::server::AppState;

/// All API routes, without middleware or state
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health::router())
        .merge(users::router())
        .merge(follows::router())
        .merge(posts::router())
}
