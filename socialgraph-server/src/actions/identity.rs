//! Identity resolution: external identity -> local user

use uuid::Uuid;

use super::{ActionError, ActionResult, SocialGraph};
use crate::models::{NewUser, Session, User, UserProfile};

impl SocialGraph {
    /// Return the caller's local user, creating it on first sight.
    ///
    /// `Ok(None)` for an anonymous session. Repeat calls return the existing
    /// row unchanged.
    pub async fn resolve_current_user(&self, session: &Session) -> ActionResult<Option<User>> {
        self.resolve_current_user_inner(session)
            .await
            .inspect_err(|e| e.log("resolve_current_user"))
    }

    async fn resolve_current_user_inner(&self, session: &Session) -> ActionResult<Option<User>> {
        let Some(identity) = session.identity() else {
            return Ok(None);
        };

        if let Some(existing) = self.store().find_user_by_external_id(&identity.subject).await? {
            return Ok(Some(existing));
        }

        let new_user = NewUser::from_identity(identity)?;
        let user = self.store().insert_user_if_absent(new_user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "synced new local user");

        Ok(Some(user))
    }

    /// Local id of the caller.
    ///
    /// `Ok(None)` when anonymous. A signed-in caller without a local row is an
    /// inconsistency and reported as `NotFound`.
    pub async fn lookup_local_id(&self, session: &Session) -> ActionResult<Option<Uuid>> {
        let Some(subject) = session.subject() else {
            return Ok(None);
        };

        let user = self
            .store()
            .find_user_by_external_id(subject)
            .await?
            .ok_or_else(|| ActionError::not_found("user", subject))?;

        Ok(Some(user.id))
    }

    /// User with follower/following/post counts, by provider subject id.
    pub async fn get_user_by_external_id(
        &self,
        external_id: &str,
    ) -> ActionResult<Option<UserProfile>> {
        self.store()
            .find_profile_by_external_id(external_id)
            .await
            .map_err(ActionError::from)
            .inspect_err(|e| e.log("get_user_by_external_id"))
    }

    /// Profile of the caller, `Ok(None)` when anonymous.
    pub async fn current_profile(&self, session: &Session) -> ActionResult<Option<UserProfile>> {
        match session.subject() {
            Some(subject) => self.get_user_by_external_id(subject).await,
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::{graph, session};
    use crate::models::ExternalIdentity;

    #[tokio::test]
    async fn anonymous_resolves_to_nothing() {
        let (graph, store) = graph();
        let user = graph.resolve_current_user(&Session::anonymous()).await.unwrap();
        assert!(user.is_none());
        assert!(store.users().await.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_surfaced() {
        let (graph, store) = graph();
        store.fail_user_writes(true);

        let err = graph.resolve_current_user(&session("ada")).await.unwrap_err();
        assert!(matches!(err, ActionError::Storage(_)));
        assert_eq!(err.category(), "storage_error");
        assert!(!err.public_message().contains("user write rejected"));
        assert!(store.users().await.is_empty());

        store.fail_user_writes(false);
        assert!(graph.resolve_current_user(&session("ada")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn resolving_twice_is_idempotent() {
        let (graph, store) = graph();
        let session = session("ada");

        let first = graph.resolve_current_user(&session).await.unwrap().unwrap();
        let second = graph.resolve_current_user(&session).await.unwrap().unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(first, second);
        assert_eq!(store.users().await.len(), 1);
    }

    #[tokio::test]
    async fn new_user_fields_come_from_identity() {
        let (graph, _) = graph();
        let session = Session::authenticated(ExternalIdentity {
            subject: "user_42".into(),
            first_name: Some("Alan".into()),
            last_name: Some("Turing".into()),
            username: None,
            email_addresses: vec!["alan@bletchley.uk".into()],
            image_url: Some("https://img/alan.png".into()),
        });

        let user = graph.resolve_current_user(&session).await.unwrap().unwrap();
        assert_eq!(user.external_id, "user_42");
        assert_eq!(user.name, "Alan Turing");
        assert_eq!(user.username, "alan");
        assert_eq!(user.email, "alan@bletchley.uk");
        assert_eq!(user.image.as_deref(), Some("https://img/alan.png"));
    }

    #[tokio::test]
    async fn identity_without_email_is_validation_error() {
        let (graph, store) = graph();
        let session = Session::authenticated(ExternalIdentity::new("no_mail"));

        let err = graph.resolve_current_user(&session).await.unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
        assert!(store.users().await.is_empty());
    }

    #[tokio::test]
    async fn lookup_local_id_cases() {
        let (graph, _) = graph();

        assert_eq!(graph.lookup_local_id(&Session::anonymous()).await.unwrap(), None);

        let s = session("grace");
        let err = graph.lookup_local_id(&s).await.unwrap_err();
        assert!(matches!(err, ActionError::NotFound { resource: "user", .. }));

        let user = graph.resolve_current_user(&s).await.unwrap().unwrap();
        assert_eq!(graph.lookup_local_id(&s).await.unwrap(), Some(user.id));
    }

    #[tokio::test]
    async fn profile_includes_counts() {
        let (graph, _) = graph();
        let s = session("linus");
        graph.resolve_current_user(&s).await.unwrap();

        let profile = graph.current_profile(&s).await.unwrap().unwrap();
        assert_eq!(profile.user.external_id, "linus");
        assert_eq!(profile.counts.followers, 0);
        assert_eq!(profile.counts.posts, 0);

        assert!(graph.current_profile(&Session::anonymous()).await.unwrap().is_none());
        assert!(graph.get_user_by_external_id("nobody").await.unwrap().is_none());
    }
}
