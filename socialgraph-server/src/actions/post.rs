//! Post creation and removal

use uuid::Uuid;

use super::{ActionError, ActionResult, SocialGraph};
use crate::models::{Post, PostContent, Session};

impl SocialGraph {
    /// Publish a post as the caller.
    pub async fn create_post(
        &self,
        session: &Session,
        content: &str,
        image: Option<&str>,
    ) -> ActionResult<Post> {
        let post = self
            .create_post_inner(session, content, image)
            .await
            .inspect_err(|e| e.log("create_post"))?;

        self.invalidate_home();
        Ok(post)
    }

    async fn create_post_inner(
        &self,
        session: &Session,
        content: &str,
        image: Option<&str>,
    ) -> ActionResult<Post> {
        let user_id = self.require_local_id(session).await?;
        let content = PostContent::new(content)?;
        let image = image.map(str::trim).filter(|i| !i.is_empty());

        let post = self.store().insert_post(user_id, &content, image).await?;
        tracing::info!(%user_id, post_id = %post.id, "post created");
        Ok(post)
    }

    /// Delete a post. Only its author may do so.
    ///
    /// Dependent comments and notifications are removed by the store's
    /// cascade rules.
    pub async fn delete_post(&self, session: &Session, post_id: Uuid) -> ActionResult<()> {
        self.delete_post_inner(session, post_id)
            .await
            .inspect_err(|e| e.log("delete_post"))?;

        self.invalidate_home();
        Ok(())
    }

    async fn delete_post_inner(&self, session: &Session, post_id: Uuid) -> ActionResult<()> {
        let user_id = self.require_local_id(session).await?;

        let post = self
            .store()
            .find_post(post_id)
            .await?
            .ok_or_else(|| ActionError::not_found("post", post_id))?;

        if post.author_id != user_id {
            return Err(ActionError::Unauthorized {
                reason: "only the author can delete this post",
            });
        }

        if !self.store().delete_post(post_id, user_id).await? {
            // deleted between lookup and delete
            return Err(ActionError::not_found("post", post_id));
        }

        tracing::info!(%user_id, %post_id, "post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::{graph, signed_in};

    #[tokio::test]
    async fn author_can_delete() {
        let (graph, store) = graph();
        let (author, _) = signed_in(&graph, "author").await;
        let post = graph.create_post(&author, "ephemeral", None).await.unwrap();

        graph.delete_post(&author, post.id).await.unwrap();
        assert!(store.posts().await.is_empty());
    }

    #[tokio::test]
    async fn non_author_cannot_delete() {
        let (graph, store) = graph();
        let (author, _) = signed_in(&graph, "author").await;
        let (intruder, _) = signed_in(&graph, "intruder").await;
        let post = graph.create_post(&author, "mine", None).await.unwrap();

        let err = graph.delete_post(&intruder, post.id).await.unwrap_err();
        assert!(matches!(err, ActionError::Unauthorized { .. }));
        assert_eq!(store.posts().await, vec![post]);
    }

    #[tokio::test]
    async fn deleting_missing_post_is_not_found() {
        let (graph, _) = graph();
        let (author, _) = signed_in(&graph, "author").await;

        let err = graph.delete_post(&author, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ActionError::NotFound { resource: "post", .. }));
    }

    #[tokio::test]
    async fn delete_removes_comments_and_notifications() {
        let (graph, store) = graph();
        let (author, _) = signed_in(&graph, "author").await;
        let (reader, _) = signed_in(&graph, "reader").await;
        let post = graph.create_post(&author, "discuss", None).await.unwrap();
        graph.create_comment(&reader, post.id, "ok").await.unwrap();

        graph.delete_post(&author, post.id).await.unwrap();
        assert!(store.comments().await.is_empty());
        assert!(store.notifications().await.is_empty());
    }

    #[tokio::test]
    async fn anonymous_delete_is_rejected() {
        let (graph, store) = graph();
        let (author, _) = signed_in(&graph, "author").await;
        let post = graph.create_post(&author, "p", None).await.unwrap();

        let err = graph
            .delete_post(&Session::anonymous(), post.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::Unauthenticated));
        assert_eq!(store.posts().await.len(), 1);
    }

    #[tokio::test]
    async fn create_post_keeps_text_and_drops_blank_image() {
        let (graph, _) = graph();
        let (author, user) = signed_in(&graph, "author").await;

        let post = graph
            .create_post(&author, "  hello  ", Some("  "))
            .await
            .unwrap();
        assert_eq!(post.content, "  hello  ");
        assert_eq!(post.author_id, user.id);
        assert_eq!(post.image, None);

        let err = graph.create_post(&author, "", None).await.unwrap_err();
        assert!(matches!(err, ActionError::Validation(_)));
    }
}
