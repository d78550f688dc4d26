//! Follow edge repository
//!
//! Edge creation and its FOLLOW notification share one transaction. A
//! duplicate edge (concurrent double toggle) is absorbed by ON CONFLICT.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::StoreError;
use crate::models::NotificationKind;

use super::map_fk_violation;

/// Follow repository
pub struct FollowRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> FollowRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn exists(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool, StoreError> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.0)
    }

    /// Delete the edge. Idempotent - returns false if it was already gone.
    pub async fn delete(&self, follower_id: Uuid, following_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
            .bind(follower_id)
            .bind(following_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Create edge + FOLLOW notification (atomic).
    ///
    /// Returns false without writing a notification when the edge already exists.
    pub async fn create_with_notification(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO follows (follower_id, following_id)
            VALUES ($1, $2)
            ON CONFLICT (follower_id, following_id) DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_fk_violation(e, "user", following_id))?;

        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO notifications (kind, user_id, creator_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(NotificationKind::Follow.as_str())
        .bind(following_id)
        .bind(follower_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::UserRepo;
    use crate::db::{create_pool, migrations};
    use crate::models::NewUser;

    async fn setup() -> (PgPool, Uuid, Uuid) {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool");
        migrations::run(&pool).await.expect("migrations");

        let mut ids = Vec::new();
        for _ in 0..2 {
            let user = UserRepo::new(&pool)
                .insert_if_absent(NewUser {
                    external_id: format!("test_{}", Uuid::new_v4()),
                    name: String::new(),
                    username: "u".into(),
                    email: "u@example.com".into(),
                    image: None,
                })
                .await
                .expect("user");
            ids.push(user.id);
        }
        (pool, ids[0], ids[1])
    }

    async fn follow_notifications(pool: &PgPool, recipient: Uuid) -> i64 {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND kind = 'FOLLOW'",
        )
        .bind(recipient)
        .fetch_one(pool)
        .await
        .expect("count");
        row.0
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_create_is_benign() {
        let (pool, a, b) = setup().await;
        let repo = FollowRepo::new(&pool);

        assert!(repo.create_with_notification(a, b).await.unwrap());
        assert!(!repo.create_with_notification(a, b).await.unwrap());
        assert_eq!(follow_notifications(&pool, b).await, 1);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn missing_target_is_not_found() {
        let (pool, a, _) = setup().await;
        let err = FollowRepo::new(&pool)
            .create_with_notification(a, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { resource: "user", .. }));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_is_idempotent() {
        let (pool, a, b) = setup().await;
        let repo = FollowRepo::new(&pool);
        repo.create_with_notification(a, b).await.unwrap();

        assert!(repo.delete(a, b).await.unwrap());
        assert!(!repo.delete(a, b).await.unwrap());
        assert!(!repo.exists(a, b).await.unwrap());
    }
}
