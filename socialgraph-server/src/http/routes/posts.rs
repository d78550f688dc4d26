//! Post and comment endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{CurrentSession, JsonBody, ValidUuid};
use crate::http::server::AppState;
use crate::models::{Comment, Post};

/// Create post request
#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Create comment request
#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

#[derive(Serialize)]
pub struct PostResponse {
    pub success: bool,
    pub post: Post,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub success: bool,
    pub comment: Comment,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// POST /posts - publish a post
async fn create_post(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let post = state
        .graph
        .create_post(&session, &req.content, req.image.as_deref())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            success: true,
            post,
        }),
    ))
}

/// DELETE /posts/{id} - author-only removal
async fn delete_post(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    ValidUuid(post_id): ValidUuid,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.graph.delete_post(&session, post_id).await?;
    Ok(Json(DeleteResponse { success: true }))
}

/// POST /posts/{id}/comments - comment on a post
async fn create_comment(
    State(state): State<Arc<AppState>>,
    CurrentSession(session): CurrentSession,
    ValidUuid(post_id): ValidUuid,
    JsonBody(req): JsonBody<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let comment = state
        .graph
        .create_comment(&session, post_id, &req.content)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            success: true,
            comment,
        }),
    ))
}

/// Post routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/posts", post(create_post))
        .route("/posts/{id}", delete(delete_post))
        .route("/posts/{id}/comments", post(create_comment))
}
