//! Data-access seam for the social graph
//!
//! `SocialStore` is implemented by `PgStore` (Postgres, via the repos) and
//! `MemoryStore` (tests and `serve --memory`). Methods whose names end in
//! `_with_notification` are all-or-nothing units.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{
    Comment, CommentContent, NewUser, Notification, Post, PostContent, SuggestedUser, User,
    UserProfile,
};

use super::repos::{CommentRepo, FollowRepo, PostRepo, UserRepo};

/// Data-access error
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

#[async_trait]
pub trait SocialStore: Send + Sync {
    /// Cheap reachability check for `/health`.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_user_by_external_id(&self, external_id: &str)
        -> Result<Option<User>, StoreError>;

    /// Insert a user, or return the existing row for the same external id unchanged.
    async fn insert_user_if_absent(&self, user: NewUser) -> Result<User, StoreError>;

    async fn user_exists(&self, id: Uuid) -> Result<bool, StoreError>;

    /// User plus follower/following/post counts.
    async fn find_profile_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<UserProfile>, StoreError>;

    /// Random users that `user_id` is not and does not already follow.
    async fn suggested_users(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> Result<Vec<SuggestedUser>, StoreError>;

    async fn follow_exists(&self, follower_id: Uuid, following_id: Uuid)
        -> Result<bool, StoreError>;

    /// Returns false when there was no edge to delete.
    async fn delete_follow(&self, follower_id: Uuid, following_id: Uuid)
        -> Result<bool, StoreError>;

    /// Create the edge and a FOLLOW notification for `following_id` atomically.
    ///
    /// Returns false (and writes nothing) when the edge already exists.
    async fn create_follow_with_notification(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, StoreError>;

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError>;

    async fn insert_post(
        &self,
        author_id: Uuid,
        content: &PostContent,
        image: Option<&str>,
    ) -> Result<Post, StoreError>;

    /// Delete a post owned by `author_id`. Returns false when no such post exists.
    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<bool, StoreError>;

    /// Create the comment and, when `author_id` is not the post's author,
    /// a COMMENT notification for the post author, atomically.
    async fn create_comment_with_notification(
        &self,
        post: &Post,
        author_id: Uuid,
        content: &CommentContent,
    ) -> Result<(Comment, Option<Notification>), StoreError>;
}

/// Postgres-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SocialStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(super::pool::ping(&self.pool).await?)
    }

    async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, StoreError> {
        UserRepo::new(&self.pool).find_by_external_id(external_id).await
    }

    async fn insert_user_if_absent(&self, user: NewUser) -> Result<User, StoreError> {
        UserRepo::new(&self.pool).insert_if_absent(user).await
    }

    async fn user_exists(&self, id: Uuid) -> Result<bool, StoreError> {
        UserRepo::new(&self.pool).exists(id).await
    }

    async fn find_profile_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<UserProfile>, StoreError> {
        UserRepo::new(&self.pool).profile_by_external_id(external_id).await
    }

    async fn suggested_users(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> Result<Vec<SuggestedUser>, StoreError> {
        UserRepo::new(&self.pool).suggested(user_id, limit).await
    }

    async fn follow_exists(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, StoreError> {
        FollowRepo::new(&self.pool).exists(follower_id, following_id).await
    }

    async fn delete_follow(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, StoreError> {
        FollowRepo::new(&self.pool).delete(follower_id, following_id).await
    }

    async fn create_follow_with_notification(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, StoreError> {
        FollowRepo::new(&self.pool)
            .create_with_notification(follower_id, following_id)
            .await
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        PostRepo::new(&self.pool).find(id).await
    }

    async fn insert_post(
        &self,
        author_id: Uuid,
        content: &PostContent,
        image: Option<&str>,
    ) -> Result<Post, StoreError> {
        PostRepo::new(&self.pool).insert(author_id, content, image).await
    }

    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<bool, StoreError> {
        PostRepo::new(&self.pool).delete_owned(id, author_id).await
    }

    async fn create_comment_with_notification(
        &self,
        post: &Post,
        author_id: Uuid,
        content: &CommentContent,
    ) -> Result<(Comment, Option<Notification>), StoreError> {
        CommentRepo::new(&self.pool)
            .create_with_notification(post, author_id, content)
            .await
    }
}
