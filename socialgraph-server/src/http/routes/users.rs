//! Caller identity and follow suggestion endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::CurrentSession;
use crate::http::server::AppState;
use crate::models::{SuggestedUser, User, UserProfile};

/// `user` is null for anonymous callers
#[derive(Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub user: Option<User>,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: Option<UserProfile>,
}

#[derive(Serialize)]
pub struct SuggestedResponse {
    pub success: bool,
    pub users: Vec<SuggestedUser>,
}

/// POST /me/sync - create the local user on first sight
async fn sync_me(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<SyncResponse>, ApiError> {
    let user = state.graph.resolve_current_user(&session).await?;
    Ok(Json(SyncResponse {
        success: true,
        user,
    }))
}

/// GET /me - caller profile with counts
async fn get_me(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state.graph.current_profile(&session).await?;
    Ok(Json(ProfileResponse {
        success: true,
        user,
    }))
}

/// GET /users/suggested - up to three users to follow
async fn suggested(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
) -> Json<SuggestedResponse> {
    Json(SuggestedResponse {
        success: true,
        users: state.graph.suggested_users(&session).await,
    })
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/sync", post(sync_me))
        .route("/users/suggested", get(suggested))
}
