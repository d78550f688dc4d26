//! Follow toggle and follow suggestions

use uuid::Uuid;

use super::{ActionError, ActionResult, SocialGraph, SUGGESTION_LIMIT};
use crate::models::{FollowState, Session, SuggestedUser};

impl SocialGraph {
    /// Flip the caller -> target follow edge.
    ///
    /// Creating the edge also creates a FOLLOW notification for the target,
    /// atomically. A concurrent toggle that already created or removed the
    /// edge is treated as success.
    pub async fn toggle_follow(
        &self,
        session: &Session,
        target_user_id: Uuid,
    ) -> ActionResult<FollowState> {
        let state = self
            .toggle_follow_inner(session, target_user_id)
            .await
            .inspect_err(|e| e.log("toggle_follow"))?;

        self.invalidate_home();
        Ok(state)
    }

    async fn toggle_follow_inner(
        &self,
        session: &Session,
        target_user_id: Uuid,
    ) -> ActionResult<FollowState> {
        let user_id = self.require_local_id(session).await?;

        if user_id == target_user_id {
            return Err(ActionError::Unauthorized {
                reason: "you cannot follow yourself",
            });
        }

        if self.store().follow_exists(user_id, target_user_id).await? {
            let removed = self.store().delete_follow(user_id, target_user_id).await?;
            if !removed {
                tracing::debug!(%user_id, %target_user_id, "edge already removed concurrently");
            }
            tracing::info!(%user_id, %target_user_id, "unfollowed");
            return Ok(FollowState::Unfollowed);
        }

        if !self.store().user_exists(target_user_id).await? {
            return Err(ActionError::not_found("user", target_user_id));
        }

        let created = self
            .store()
            .create_follow_with_notification(user_id, target_user_id)
            .await?;
        if !created {
            tracing::debug!(%user_id, %target_user_id, "edge already created concurrently");
        }
        tracing::info!(%user_id, %target_user_id, "followed");

        Ok(FollowState::Followed)
    }

    /// Whether the caller follows `target_user_id`. False when anonymous.
    pub async fn is_following(&self, session: &Session, target_user_id: Uuid) -> ActionResult<bool> {
        self.is_following_inner(session, target_user_id)
            .await
            .inspect_err(|e| e.log("is_following"))
    }

    async fn is_following_inner(&self, session: &Session, target_user_id: Uuid) -> ActionResult<bool> {
        match self.lookup_local_id(session).await? {
            Some(user_id) => Ok(self.store().follow_exists(user_id, target_user_id).await?),
            None => Ok(false),
        }
    }

    /// Up to three random users the caller is not and does not follow yet.
    ///
    /// Never fails: anonymous callers and errors both yield an empty list.
    pub async fn suggested_users(&self, session: &Session) -> Vec<SuggestedUser> {
        self.suggested_users_inner(session)
            .await
            .unwrap_or_else(|e| {
                e.log("suggested_users");
                Vec::new()
            })
    }

    async fn suggested_users_inner(&self, session: &Session) -> ActionResult<Vec<SuggestedUser>> {
        let Some(user_id) = self.lookup_local_id(session).await? else {
            return Ok(Vec::new());
        };

        Ok(self
            .store()
            .suggested_users(user_id, SUGGESTION_LIMIT)
            .await?)
    }
}
