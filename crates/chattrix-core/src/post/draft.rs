//! Post drafts and edits

use super::attachment::Attachment;
use super::model::Post;
use crate::types::{CategoryId, PostId, UserId};
use crate::validator::parse_tags;
use chrono::Utc;
use std::collections::BTreeSet;

/// Caller input for a new post
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub(crate) category_id: CategoryId,
    pub(crate) author_id: UserId,
    pub(crate) author_name: String,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) tags: Vec<String>,
    pub(crate) attachments: Vec<Attachment>,
}

impl PostDraft {
    /// Start a draft with the required fields
    pub fn new(
        category_id: CategoryId,
        author_id: impl Into<UserId>,
        author_name: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            category_id,
            author_id: author_id.into(),
            author_name: author_name.into(),
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Add a tag
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Add multiple tags
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Add tags from a comma separated string
    pub fn tag_list(self, raw: &str) -> Self {
        self.tags(parse_tags(raw))
    }

    /// Attach a file
    pub fn attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Category the post will be filed under
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    pub(crate) fn into_post(self, id: PostId, tags: Vec<String>) -> Post {
        Post {
            id,
            category_id: self.category_id,
            title: self.title.trim().to_string(),
            content: self.content,
            author_id: self.author_id,
            author_name: self.author_name,
            tags,
            attachments: self.attachments,
            created_at: Utc::now(),
            updated_at: None,
            liked_by: BTreeSet::new(),
            like_count: 0,
            comments: Vec::new(),
            comment_count: 0,
        }
    }
}

/// Edit to an existing post; unset fields are left as they are
#[derive(Debug, Clone, Default)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl PostUpdate {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replace the body
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Replace the tag list
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = Some(tags.into_iter().map(|t| t.into()).collect());
        self
    }

    /// Check if the update changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}
