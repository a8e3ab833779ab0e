//! Per-user activity totals

use crate::post::Post;
use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// What a user has contributed to the forum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserActivity {
    pub user_id: UserId,
    /// Posts the user created
    pub posts_authored: usize,
    /// Comments and replies the user wrote
    pub comments_authored: usize,
    /// Likes on the user's posts
    pub likes_received: usize,
    /// Posts the user liked
    pub likes_given: usize,
}

impl UserActivity {
    /// Tally a user's activity over a post collection
    pub fn collect(user_id: &UserId, posts: &[Post]) -> Self {
        let mut activity = UserActivity {
            user_id: user_id.clone(),
            posts_authored: 0,
            comments_authored: 0,
            likes_received: 0,
            likes_given: 0,
        };

        for post in posts {
            if &post.author_id == user_id {
                activity.posts_authored += 1;
                activity.likes_received += post.like_count;
            }
            if post.is_liked_by(user_id) {
                activity.likes_given += 1;
            }
            activity.comments_authored += post
                .all_comments()
                .filter(|c| &c.author_id == user_id)
                .count();
        }

        activity
    }

    /// Check if the user has done anything at all
    pub fn is_empty(&self) -> bool {
        self.posts_authored == 0 && self.comments_authored == 0 && self.likes_given == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CommentDraft;
    use crate::post::model::tests::create_test_post;
    use crate::types::CommentId;

    #[test]
    fn test_collect_activity() {
        let mut own = create_test_post(1);
        own.author_id = UserId::new("alice");
        own.add_like(UserId::new("bob"));
        own.add_like(UserId::new("carol"));

        let mut other = create_test_post(2);
        other.add_like(UserId::new("alice"));
        let top = CommentDraft::new("alice", "Alice", "hi").into_comment(CommentId::new(), other.id);
        let top_id = top.id.clone();
        other.attach_comment(top).unwrap();
        let reply = CommentDraft::new("alice", "Alice", "again")
            .reply_to(top_id)
            .into_comment(CommentId::new(), other.id);
        other.attach_comment(reply).unwrap();

        let activity = UserActivity::collect(&UserId::new("alice"), &[own, other]);
        assert_eq!(activity.posts_authored, 1);
        assert_eq!(activity.likes_received, 2);
        assert_eq!(activity.likes_given, 1);
        assert_eq!(activity.comments_authored, 2);
        assert!(!activity.is_empty());
    }

    #[test]
    fn test_unknown_user() {
        let activity = UserActivity::collect(&UserId::new("nobody"), &[create_test_post(1)]);
        assert!(activity.is_empty());
        assert_eq!(
            activity,
            UserActivity {
                user_id: UserId::new("nobody"),
                posts_authored: 0,
                comments_authored: 0,
                likes_received: 0,
                likes_given: 0,
            }
        );
    }
}
