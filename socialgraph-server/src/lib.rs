//! socialgraph-server: social graph actions over HTTP
//!
//! Resolves externally authenticated users to local rows, toggles follow
//! edges, records comments and removes posts, each as a small unit against
//! Postgres followed by a cache-revalidation signal.

pub mod actions;
pub mod cache;
pub mod db;
pub mod http;
pub mod models;

pub use actions::{ActionError, ActionResult, SocialGraph};
pub use cache::{Revalidation, Revalidator};
pub use db::{MemoryStore, PgStore, SocialStore, StoreError};
pub use models::{ExternalIdentity, Session};
