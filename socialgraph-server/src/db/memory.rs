//! In-memory `SocialStore`
//!
//! One mutex guards every table, so each method (including the
//! `_with_notification` pairs) is atomic. Used by the test suite and by
//! `serve --memory`.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rand::seq::SliceRandom;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{SocialStore, StoreError};
use crate::models::{
    Comment, CommentContent, NewUser, Notification, NotificationKind, Post, PostContent,
    SuggestedUser, User, UserCounts, UserProfile,
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    /// (follower_id, following_id)
    follows: Vec<(Uuid, Uuid)>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn followers_of(&self, id: Uuid) -> i64 {
        self.follows.iter().filter(|(_, to)| *to == id).count() as i64
    }

    fn has_follow(&self, follower_id: Uuid, following_id: Uuid) -> bool {
        self.follows.contains(&(follower_id, following_id))
    }

    fn has_user(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_notifications: AtomicBool,
    fail_user_writes: AtomicBool,
    stale_follow_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent notification write fail (fault injection).
    pub fn fail_notification_writes(&self, fail: bool) {
        self.fail_notifications.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent user insert fail.
    pub fn fail_user_writes(&self, fail: bool) {
        self.fail_user_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `follow_exists` report the opposite of the stored state, as if
    /// another request toggled the edge between the check and the write.
    pub fn stale_follow_reads(&self, stale: bool) {
        self.stale_follow_reads.store(stale, Ordering::SeqCst);
    }

    fn check_notification_write(&self) -> Result<(), StoreError> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("notification write rejected".into()));
        }
        Ok(())
    }

    pub async fn users(&self) -> Vec<User> {
        self.tables.lock().await.users.clone()
    }

    pub async fn follows(&self) -> Vec<(Uuid, Uuid)> {
        self.tables.lock().await.follows.clone()
    }

    pub async fn posts(&self) -> Vec<Post> {
        self.tables.lock().await.posts.clone()
    }

    pub async fn comments(&self) -> Vec<Comment> {
        self.tables.lock().await.comments.clone()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.tables.lock().await.notifications.clone()
    }
}

#[async_trait]
impl SocialStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<User>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.external_id == external_id)
            .cloned())
    }

    async fn insert_user_if_absent(&self, user: NewUser) -> Result<User, StoreError> {
        if self.fail_user_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("user write rejected".into()));
        }

        let mut tables = self.tables.lock().await;
        if let Some(existing) = tables
            .users
            .iter()
            .find(|u| u.external_id == user.external_id)
        {
            return Ok(existing.clone());
        }

        let row = User {
            id: Uuid::new_v4(),
            external_id: user.external_id,
            name: user.name,
            username: user.username,
            email: user.email,
            image: user.image,
            created_at: Utc::now(),
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn user_exists(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tables.lock().await.has_user(id))
    }

    async fn find_profile_by_external_id(
        &self,
        external_id: &str,
    ) -> Result<Option<UserProfile>, StoreError> {
        let tables = self.tables.lock().await;
        let Some(user) = tables
            .users
            .iter()
            .find(|u| u.external_id == external_id)
            .cloned()
        else {
            return Ok(None);
        };

        let counts = UserCounts {
            followers: tables.followers_of(user.id),
            following: tables.follows.iter().filter(|(from, _)| *from == user.id).count() as i64,
            posts: tables.posts.iter().filter(|p| p.author_id == user.id).count() as i64,
        };

        Ok(Some(UserProfile { user, counts }))
    }

    async fn suggested_users(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> Result<Vec<SuggestedUser>, StoreError> {
        let tables = self.tables.lock().await;
        let mut candidates: Vec<SuggestedUser> = tables
            .users
            .iter()
            .filter(|u| u.id != user_id && !tables.has_follow(user_id, u.id))
            .map(|u| SuggestedUser {
                id: u.id,
                name: u.name.clone(),
                username: u.username.clone(),
                image: u.image.clone(),
                follower_count: tables.followers_of(u.id),
            })
            .collect();

        candidates.shuffle(&mut rand::thread_rng());
        candidates.truncate(limit as usize);
        Ok(candidates)
    }

    async fn follow_exists(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, StoreError> {
        let exists = self.tables.lock().await.has_follow(follower_id, following_id);
        Ok(exists != self.stale_follow_reads.load(Ordering::SeqCst))
    }

    async fn delete_follow(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.follows.len();
        tables
            .follows
            .retain(|edge| *edge != (follower_id, following_id));
        Ok(tables.follows.len() < before)
    }

    async fn create_follow_with_notification(
        &self,
        follower_id: Uuid,
        following_id: Uuid,
    ) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;

        if !tables.has_user(following_id) {
            return Err(StoreError::not_found("user", following_id));
        }
        if tables.has_follow(follower_id, following_id) {
            return Ok(false);
        }

        self.check_notification_write()?;

        tables.follows.push((follower_id, following_id));
        tables.notifications.push(Notification {
            id: Uuid::new_v4(),
            kind: NotificationKind::Follow,
            user_id: following_id,
            creator_id: follower_id,
            post_id: None,
            comment_id: None,
            read: false,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_post(
        &self,
        author_id: Uuid,
        content: &PostContent,
        image: Option<&str>,
    ) -> Result<Post, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.has_user(author_id) {
            return Err(StoreError::not_found("user", author_id));
        }

        let post = Post {
            id: Uuid::new_v4(),
            author_id,
            content: content.as_str().to_owned(),
            image: image.map(str::to_owned),
            created_at: Utc::now(),
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn delete_post(&self, id: Uuid, author_id: Uuid) -> Result<bool, StoreError> {
        let mut tables = self.tables.lock().await;
        let before = tables.posts.len();
        tables
            .posts
            .retain(|p| !(p.id == id && p.author_id == author_id));
        if tables.posts.len() == before {
            return Ok(false);
        }

        // cascade
        let removed_comments: Vec<Uuid> = tables
            .comments
            .iter()
            .filter(|c| c.post_id == id)
            .map(|c| c.id)
            .collect();
        tables.comments.retain(|c| c.post_id != id);
        tables.notifications.retain(|n| {
            n.post_id != Some(id)
                && !n
                    .comment_id
                    .is_some_and(|cid| removed_comments.contains(&cid))
        });
        Ok(true)
    }

    async fn create_comment_with_notification(
        &self,
        post: &Post,
        author_id: Uuid,
        content: &CommentContent,
    ) -> Result<(Comment, Option<Notification>), StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.posts.iter().any(|p| p.id == post.id) {
            return Err(StoreError::not_found("post", post.id));
        }

        let comment = Comment {
            id: Uuid::new_v4(),
            content: content.as_str().to_owned(),
            author_id,
            post_id: post.id,
            created_at: Utc::now(),
        };

        let notification = if post.author_id != author_id {
            self.check_notification_write()?;
            Some(Notification {
                id: Uuid::new_v4(),
                kind: NotificationKind::Comment,
                user_id: post.author_id,
                creator_id: author_id,
                post_id: Some(post.id),
                comment_id: Some(comment.id),
                read: false,
                created_at: Utc::now(),
            })
        } else {
            None
        };

        tables.comments.push(comment.clone());
        if let Some(n) = &notification {
            tables.notifications.push(n.clone());
        }
        Ok((comment, notification))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(external_id: &str) -> NewUser {
        NewUser {
            external_id: external_id.to_owned(),
            name: "N".into(),
            username: external_id.to_owned(),
            email: format!("{external_id}@example.com"),
            image: None,
        }
    }

    #[tokio::test]
    async fn insert_user_if_absent_keeps_first_row() {
        let store = MemoryStore::new();
        let first = store.insert_user_if_absent(new_user("a")).await.unwrap();
        let mut again = new_user("a");
        again.name = "changed".into();
        let second = store.insert_user_if_absent(again).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.users().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_notification_leaves_no_edge() {
        let store = MemoryStore::new();
        let a = store.insert_user_if_absent(new_user("a")).await.unwrap();
        let b = store.insert_user_if_absent(new_user("b")).await.unwrap();

        store.fail_notification_writes(true);
        let err = store
            .create_follow_with_notification(a.id, b.id)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(store.follows().await.is_empty());
        assert!(store.notifications().await.is_empty());
    }

    #[tokio::test]
    async fn duplicate_follow_is_a_no_op() {
        let store = MemoryStore::new();
        let a = store.insert_user_if_absent(new_user("a")).await.unwrap();
        let b = store.insert_user_if_absent(new_user("b")).await.unwrap();

        assert!(store.create_follow_with_notification(a.id, b.id).await.unwrap());
        assert!(!store.create_follow_with_notification(a.id, b.id).await.unwrap());

        assert_eq!(store.follows().await, vec![(a.id, b.id)]);
        assert_eq!(store.notifications().await.len(), 1);
    }

    #[tokio::test]
    async fn deleting_a_missing_edge_returns_false() {
        let store = MemoryStore::new();
        let a = store.insert_user_if_absent(new_user("a")).await.unwrap();
        let b = store.insert_user_if_absent(new_user("b")).await.unwrap();
        store.create_follow_with_notification(a.id, b.id).await.unwrap();

        assert!(store.delete_follow(a.id, b.id).await.unwrap());
        assert!(!store.delete_follow(a.id, b.id).await.unwrap());
        assert!(!store.follow_exists(a.id, b.id).await.unwrap());
    }

    #[tokio::test]
    async fn failed_user_write_inserts_nothing() {
        let store = MemoryStore::new();
        store.fail_user_writes(true);

        let err = store.insert_user_if_absent(new_user("a")).await.unwrap_err();
        assert!(matches!(err, StoreError::Backend(_)));
        assert!(store.users().await.is_empty());
    }

    #[tokio::test]
    async fn delete_post_cascades() {
        let store = MemoryStore::new();
        let a = store.insert_user_if_absent(new_user("a")).await.unwrap();
        let b = store.insert_user_if_absent(new_user("b")).await.unwrap();
        let post = store
            .insert_post(a.id, &PostContent::new("p").unwrap(), None)
            .await
            .unwrap();
        store
            .create_comment_with_notification(&post, b.id, &CommentContent::new("c").unwrap())
            .await
            .unwrap();

        // wrong owner: nothing happens
        assert!(!store.delete_post(post.id, b.id).await.unwrap());
        assert_eq!(store.comments().await.len(), 1);

        assert!(store.delete_post(post.id, a.id).await.unwrap());
        assert!(store.posts().await.is_empty());
        assert!(store.comments().await.is_empty());
        assert!(store.notifications().await.is_empty());
    }

    #[tokio::test]
    async fn suggestions_exclude_self_and_followed() {
        let store = MemoryStore::new();
        let me = store.insert_user_if_absent(new_user("me")).await.unwrap();
        let mut others = Vec::new();
        for name in ["b", "c", "d", "e"] {
            others.push(store.insert_user_if_absent(new_user(name)).await.unwrap());
        }
        store
            .create_follow_with_notification(me.id, others[0].id)
            .await
            .unwrap();

        let suggested = store.suggested_users(me.id, 10).await.unwrap();
        assert_eq!(suggested.len(), 3);
        assert!(suggested.iter().all(|s| s.id != me.id && s.id != others[0].id));

        let limited = store.suggested_users(me.id, 2).await.unwrap();
        assert_eq!(limited.len(), 2);
    }
}
