//! Social graph operations
//!
//! Each operation takes the caller's `Session` explicitly, does one store
//! call or one atomic unit, signals cache revalidation on success and logs
//! any failure at its own boundary.

pub mod comment;
pub mod error;
pub mod follow;
pub mod identity;
pub mod post;

use std::sync::Arc;

use uuid::Uuid;

pub use error::{ActionError, ActionResult};

use crate::cache::{Revalidator, HOME_PATH};
use crate::db::SocialStore;
use crate::models::Session;

/// How many users `suggested_users` returns at most
pub const SUGGESTION_LIMIT: u32 = 3;

/// Entry point for all social graph operations
#[derive(Clone)]
pub struct SocialGraph {
    store: Arc<dyn SocialStore>,
    revalidator: Revalidator,
}

impl SocialGraph {
    pub fn new(store: Arc<dyn SocialStore>, revalidator: Revalidator) -> Self {
        Self { store, revalidator }
    }

    pub fn revalidator(&self) -> &Revalidator {
        &self.revalidator
    }

    pub(crate) fn store(&self) -> &dyn SocialStore {
        self.store.as_ref()
    }

    /// Whether the store answers. Failures are logged, not returned.
    pub async fn storage_ready(&self) -> bool {
        match self.store.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "storage ping failed");
                false
            }
        }
    }

    pub(crate) fn invalidate_home(&self) {
        self.revalidator.revalidate_path(HOME_PATH);
    }

    /// Local id of a caller that must be signed in.
    pub(crate) async fn require_local_id(&self, session: &Session) -> ActionResult<Uuid> {
        self.lookup_local_id(session)
            .await?
            .ok_or(ActionError::Unauthenticated)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::SocialGraph;
    use crate::cache::Revalidator;
    use crate::db::MemoryStore;
    use crate::models::{ExternalIdentity, Session, User};

    pub fn graph() -> (SocialGraph, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let graph = SocialGraph::new(store.clone(), Revalidator::default());
        (graph, store)
    }

    pub fn session(subject: &str) -> Session {
        Session::authenticated(ExternalIdentity {
            subject: subject.to_owned(),
            first_name: Some(subject.to_owned()),
            last_name: None,
            username: None,
            email_addresses: vec![format!("{subject}@example.com")],
            image_url: None,
        })
    }

    /// Session plus its synced local user
    pub async fn signed_in(graph: &SocialGraph, subject: &str) -> (Session, User) {
        let session = session(subject);
        let user = graph
            .resolve_current_user(&session)
            .await
            .expect("resolve")
            .expect("user");
        (session, user)
    }
}
