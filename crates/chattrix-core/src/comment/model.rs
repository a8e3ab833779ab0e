//! Comment data models

use crate::types::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a post, either top-level or a reply to a top-level comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,
    /// Post this comment belongs to
    pub post_id: PostId,
    /// Top-level comment this one replies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<CommentId>,
    /// Author identifier at creation time
    pub author_id: UserId,
    /// Author display name at creation time
    pub author_name: String,
    /// Comment content
    pub content: String,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// When the content was last edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Replies, in arrival order. Always empty on a reply.
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    /// Check if this comment is a reply
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Number of comments in this subtree, including this one
    pub fn subtree_size(&self) -> usize {
        1 + self.replies.iter().map(Comment::subtree_size).sum::<usize>()
    }

    /// Replace the content and stamp the edit time
    pub fn update_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated_at = Some(Utc::now());
    }

    /// Check if the comment was edited after creation
    pub fn is_edited(&self) -> bool {
        self.updated_at.is_some()
    }
}
