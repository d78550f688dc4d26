//! User repository
//!
//! - insert: INSERT with ON CONFLICT on external id (idempotent)
//! - profile: counts via scalar subqueries in one statement

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::db::StoreError;
use crate::models::{NewUser, SuggestedUser, User, UserCounts, UserProfile};

const USER_COLUMNS: &str = "id, external_id, name, username, email, image, created_at";

/// User repository
pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE external_id = $1"
        ))
        .bind(external_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Insert a user, returning the existing row on conflict.
    ///
    /// The no-op `DO UPDATE` makes `RETURNING` yield the existing row, so two
    /// concurrent first sights of the same identity both get the same user.
    pub async fn insert_if_absent(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (external_id, name, username, email, image)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (external_id) DO UPDATE SET external_id = EXCLUDED.external_id
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.external_id)
        .bind(&user.name)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.image.as_deref())
        .fetch_one(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn exists(&self, id: Uuid) -> Result<bool, StoreError> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool)
            .await?;

        Ok(row.0)
    }

    /// User with follower/following/post counts, single query.
    pub async fn profile_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<UserProfile>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT
                u.id, u.external_id, u.name, u.username, u.email, u.image, u.created_at,
                (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS followers,
                (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following,
                (SELECT COUNT(*) FROM posts p WHERE p.author_id = u.id) AS posts
            FROM users u
            WHERE u.external_id = $1
            "#,
        )
        .bind(external_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|r| UserProfile {
            user: User {
                id: r.get("id"),
                external_id: r.get("external_id"),
                name: r.get("name"),
                username: r.get("username"),
                email: r.get("email"),
                image: r.get("image"),
                created_at: r.get("created_at"),
            },
            counts: UserCounts {
                followers: r.get("followers"),
                following: r.get("following"),
                posts: r.get("posts"),
            },
        }))
    }

    /// Random users other than `user_id` that `user_id` does not follow yet.
    pub async fn suggested(&self, user_id: Uuid, limit: u32) -> Result<Vec<SuggestedUser>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT
                u.id,
                u.name,
                u.username,
                u.image,
                (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS follower_count
            FROM users u
            WHERE u.id <> $1
              AND NOT EXISTS (
                  SELECT 1 FROM follows f
                  WHERE f.follower_id = $1 AND f.following_id = u.id
              )
            ORDER BY random()
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| SuggestedUser {
                id: r.get("id"),
                name: r.get("name"),
                username: r.get("username"),
                image: r.get("image"),
                follower_count: r.get("follower_count"),
            })
            .collect())
    }
}
