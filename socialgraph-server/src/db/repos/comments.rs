//! Comment repository
//!
//! Comment + COMMENT notification are written in one transaction.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::StoreError;
use crate::models::{Comment, CommentContent, Notification, NotificationKind, Post};

use super::map_fk_violation;

/// Comment repository
pub struct CommentRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CommentRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a comment and, for someone else's post, notify the post author.
    ///
    /// Both rows are committed together or not at all.
    pub async fn create_with_notification(
        &self,
        post: &Post,
        author_id: Uuid,
        content: &CommentContent,
    ) -> Result<(Comment, Option<Notification>), StoreError> {
        let mut tx = self.pool.begin().await?;

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (content, author_id, post_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, author_id, post_id, created_at
            "#,
        )
        .bind(content.as_str())
        .bind(author_id)
        .bind(post.id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_fk_violation(e, "post", post.id))?;

        let notification = if post.author_id != author_id {
            let notification = sqlx::query_as::<_, Notification>(
                r#"
                INSERT INTO notifications (kind, user_id, creator_id, post_id, comment_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, kind, user_id, creator_id, post_id, comment_id, read, created_at
                "#,
            )
            .bind(NotificationKind::Comment.as_str())
            .bind(post.author_id)
            .bind(author_id)
            .bind(post.id)
            .bind(comment.id)
            .fetch_one(&mut *tx)
            .await?;
            Some(notification)
        } else {
            None
        };

        tx.commit().await?;
        Ok((comment, notification))
    }
}
