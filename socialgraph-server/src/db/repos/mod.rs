//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Counts via subqueries in the same statement (no N+1)
//! - Handles conflicts via ON CONFLICT (no check-then-insert)
//! - Uses transactions for multi-step operations

pub mod comments;
pub mod follows;
pub mod posts;
pub mod users;

pub use comments::CommentRepo;
pub use follows::FollowRepo;
pub use posts::PostRepo;
pub use users::UserRepo;

use uuid::Uuid;

use super::StoreError;

/// Turn a foreign-key violation into `NotFound` for the referenced resource.
pub(crate) fn map_fk_violation(err: sqlx::Error, resource: &'static str, id: Uuid) -> StoreError {
    let is_fk = matches!(&err, sqlx::Error::Database(db) if db.is_foreign_key_violation());
    if is_fk {
        StoreError::not_found(resource, id)
    } else {
        StoreError::Sqlx(err)
    }
}
