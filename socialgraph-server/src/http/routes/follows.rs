//! Follow toggle endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::{CurrentSession, ValidUuid};
use crate::http::server::AppState;
use crate::models::FollowState;

#[derive(Serialize)]
pub struct FollowResponse {
    pub success: bool,
    pub state: FollowState,
    pub following: bool,
}

#[derive(Serialize)]
pub struct FollowStatusResponse {
    pub success: bool,
    pub following: bool,
}

/// POST /users/{id}/follow - flip follow edge
async fn toggle_follow(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    ValidUuid(target): ValidUuid,
) -> Result<Json<FollowResponse>, ApiError> {
    let follow_state = state.graph.toggle_follow(&session, target).await?;
    Ok(Json(FollowResponse {
        success: true,
        state: follow_state,
        following: follow_state.is_following(),
    }))
}

/// GET /users/{id}/follow - does the caller follow this user
async fn follow_status(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    ValidUuid(target): ValidUuid,
) -> Result<Json<FollowStatusResponse>, ApiError> {
    let following = state.graph.is_following(&session, target).await?;
    Ok(Json(FollowStatusResponse {
        success: true,
        following,
    }))
}

/// Follow routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/users/{id}/follow", get(follow_status).post(toggle_follow))
}
