//! Comment drafts

use super::model::Comment;
use crate::types::{CommentId, PostId, UserId};
use chrono::Utc;

/// Caller input for a new comment
///
/// The engine validates the draft and assigns the id, post and timestamp.
#[derive(Debug, Clone)]
pub struct CommentDraft {
    pub(crate) author_id: UserId,
    pub(crate) author_name: String,
    pub(crate) content: String,
    pub(crate) parent_id: Option<CommentId>,
}

impl CommentDraft {
    /// Start a top-level comment
    pub fn new(
        author_id: impl Into<UserId>,
        author_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            author_id: author_id.into(),
            author_name: author_name.into(),
            content: content.into(),
            parent_id: None,
        }
    }

    /// Make this a reply to a top-level comment
    pub fn reply_to(mut self, parent_id: CommentId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Parent comment, if this is a reply
    pub fn parent_id(&self) -> Option<&CommentId> {
        self.parent_id.as_ref()
    }

    pub(crate) fn into_comment(self, id: CommentId, post_id: PostId) -> Comment {
        Comment {
            id,
            post_id,
            parent_id: self.parent_id,
            author_id: self.author_id,
            author_name: self.author_name,
            content: self.content,
            created_at: Utc::now(),
            updated_at: None,
            replies: Vec::new(),
        }
    }
}
