//! Posts, comments, notifications and follow state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::ValidationError;

/// Post row. Only created and deleted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Comment row. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// What a notification is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationKind {
    Follow,
    Comment,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follow => "FOLLOW",
            Self::Comment => "COMMENT",
        }
    }
}

impl TryFrom<String> for NotificationKind {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "FOLLOW" => Ok(Self::Follow),
            "COMMENT" => Ok(Self::Comment),
            _ => Err(ValidationError::InvalidVariant {
                field: "notification kind",
                value,
            }),
        }
    }
}

/// Notification row. `user_id` is the recipient, `creator_id` the actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    #[sqlx(try_from = "String")]
    pub kind: NotificationKind,
    pub user_id: Uuid,
    pub creator_id: Uuid,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Edge state after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowState {
    Followed,
    Unfollowed,
}

impl FollowState {
    pub fn is_following(&self) -> bool {
        matches!(self, Self::Followed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_kind_round_trips_through_text() {
        for kind in [NotificationKind::Follow, NotificationKind::Comment] {
            let parsed = NotificationKind::try_from(kind.as_str().to_owned()).unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn unknown_kind_rejected() {
        let err = NotificationKind::try_from("LIKE".to_owned()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidVariant { .. }));
    }

    #[test]
    fn follow_state_serializes_lowercase() {
        let json = serde_json::to_string(&FollowState::Followed).unwrap();
        assert_eq!(json, "\"followed\"");
    }
}
