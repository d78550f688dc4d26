//! Schema migrations
//!
//! Every statement is idempotent, so `run` is safe on each startup.

use sqlx::PgPool;

/// Named schema statements, applied in order
pub const STATEMENTS: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            external_id TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL DEFAULT '',
            username TEXT NOT NULL,
            email TEXT NOT NULL,
            image TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "posts",
        r#"
        CREATE TABLE IF NOT EXISTS posts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            content TEXT NOT NULL,
            image TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "follows",
        r#"
        CREATE TABLE IF NOT EXISTS follows (
            follower_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            following_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            PRIMARY KEY (follower_id, following_id),
            CHECK (follower_id <> following_id)
        )
        "#,
    ),
    (
        "comments",
        r#"
        CREATE TABLE IF NOT EXISTS comments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            content TEXT NOT NULL,
            author_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "notifications",
        r#"
        CREATE TABLE IF NOT EXISTS notifications (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            kind TEXT NOT NULL CHECK (kind IN ('FOLLOW', 'COMMENT')),
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            creator_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            post_id UUID REFERENCES posts(id) ON DELETE CASCADE,
            comment_id UUID REFERENCES comments(id) ON DELETE CASCADE,
            read BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "follows_following_idx",
        "CREATE INDEX IF NOT EXISTS follows_following_idx ON follows (following_id)",
    ),
    (
        "posts_author_idx",
        "CREATE INDEX IF NOT EXISTS posts_author_idx ON posts (author_id, created_at DESC)",
    ),
    (
        "comments_post_idx",
        "CREATE INDEX IF NOT EXISTS comments_post_idx ON comments (post_id, created_at)",
    ),
    (
        "notifications_user_idx",
        "CREATE INDEX IF NOT EXISTS notifications_user_idx ON notifications (user_id, created_at DESC)",
    ),
];

/// Run all migrations in order.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running socialgraph migrations...");

    for (name, sql) in STATEMENTS {
        tracing::debug!(migration = name, "applying");
        sqlx::query(sql).execute(pool).await?;
    }

    tracing::info!(count = STATEMENTS.len(), "Migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_created_before_their_references() {
        let position = |name: &str| {
            STATEMENTS
                .iter()
                .position(|(n, _)| *n == name)
                .unwrap_or_else(|| panic!("missing migration {name}"))
        };

        assert!(position("users") < position("posts"));
        assert!(position("posts") < position("comments"));
        assert!(position("comments") < position("notifications"));
    }

    #[test]
    fn statements_are_idempotent() {
        for (name, sql) in STATEMENTS {
            assert!(sql.contains("IF NOT EXISTS"), "{name} is not idempotent");
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn migrations_run_twice() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        run(&pool).await.expect("first run");
        run(&pool).await.expect("second run");
    }
}
