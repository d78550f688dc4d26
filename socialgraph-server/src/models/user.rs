//! Local user records

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::{ExternalIdentity, ValidationError};

/// Local user row, keyed by the identity provider's subject id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub external_id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a user created on first sight
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub external_id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub image: Option<String>,
}

impl NewUser {
    /// Derive a local user from what the identity provider reported.
    ///
    /// Requires at least one email address (used for email and, when the
    /// provider has no username, for the username as well).
    pub fn from_identity(identity: &ExternalIdentity) -> Result<Self, ValidationError> {
        if identity.subject.trim().is_empty() {
            return Err(ValidationError::Empty { field: "subject" });
        }

        let email = identity
            .primary_email()
            .ok_or(ValidationError::Empty {
                field: "email address",
            })?
            .to_owned();

        Ok(Self {
            external_id: identity.subject.clone(),
            name: identity.display_name(),
            username: identity.derived_username()?,
            email,
            image: identity.image_url.clone(),
        })
    }
}

/// Derived relationship/post counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserCounts {
    pub followers: i64,
    pub following: i64,
    pub posts: i64,
}

/// User with derived counts
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: User,
    pub counts: UserCounts,
}

/// Compact user card for follow suggestions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedUser {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub image: Option<String>,
    pub follower_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_from_identity() {
        let identity = ExternalIdentity {
            subject: "user_1".into(),
            first_name: Some("Grace".into()),
            last_name: Some("Hopper".into()),
            username: None,
            email_addresses: vec!["grace@navy.mil".into()],
            image_url: Some("https://img.example/grace.png".into()),
        };

        let user = NewUser::from_identity(&identity).unwrap();
        assert_eq!(user.external_id, "user_1");
        assert_eq!(user.name, "Grace Hopper");
        assert_eq!(user.username, "grace");
        assert_eq!(user.email, "grace@navy.mil");
        assert_eq!(user.image.as_deref(), Some("https://img.example/grace.png"));
    }

    #[test]
    fn blank_subject_rejected() {
        let mut identity = ExternalIdentity::new("  ");
        identity.email_addresses.push("a@b.c".into());
        assert!(matches!(
            NewUser::from_identity(&identity).unwrap_err(),
            ValidationError::Empty { field: "subject" }
        ));
    }
}
