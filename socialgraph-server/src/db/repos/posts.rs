//! Post repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::StoreError;
use crate::models::{Post, PostContent};

use super::map_fk_violation;

/// Post repository
pub struct PostRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, author_id, content, image, created_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(post)
    }

    pub async fn insert(
        &self,
        author_id: Uuid,
        content: &PostContent,
        image: Option<&str>,
    ) -> Result<Post, StoreError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (author_id, content, image)
            VALUES ($1, $2, $3)
            RETURNING id, author_id, content, image, created_at
            "#,
        )
        .bind(author_id)
        .bind(content.as_str())
        .bind(image)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_fk_violation(e, "user", author_id))?;

        Ok(post)
    }

    /// Delete a post only if `author_id` owns it.
    ///
    /// Comments and notifications go with it via ON DELETE CASCADE.
    pub async fn delete_owned(&self, id: Uuid, author_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
