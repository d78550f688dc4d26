//! Comment recording

use uuid::Uuid;

use super::{ActionError, ActionResult, SocialGraph};
use crate::models::{Comment, CommentContent, Session};

impl SocialGraph {
    /// Add a comment to a post.
    ///
    /// When the commenter is not the post's author, a COMMENT notification
    /// referencing the post and the new comment is written in the same unit.
    pub async fn create_comment(
        &self,
        session: &Session,
        post_id: Uuid,
        content: &str,
    ) -> ActionResult<Comment> {
        let comment = self
            .create_comment_inner(session, post_id, content)
            .await
            .inspect_err(|e| e.log("create_comment"))?;

        self.invalidate_home();
        Ok(comment)
    }

    async fn create_comment_inner(
        &self,
        session: &Session,
        post_id: Uuid,
        content: &str,
    ) -> ActionResult<Comment> {
        let user_id = self.require_local_id(session).await?;
        let content = CommentContent::new(content)?;

        let post = self
            .store()
            .find_post(post_id)
            .await?
            .ok_or_else(|| ActionError::not_found("post", post_id))?;

        let (comment, notification) = self
            .store()
            .create_comment_with_notification(&post, user_id, &content)
            .await?;

        tracing::info!(
            %user_id,
            %post_id,
            comment_id = %comment.id,
            notified = notification.is_some(),
            "comment created"
        );
        Ok(comment)
    }
}
