//! Post data models
//!
//! A post owns its like set and its comment tree. Every method that changes
//! either collection also maintains the matching counter, so `like_count`
//! and `comment_count` never drift from what they count.

use super::attachment::Attachment;
use crate::comment::Comment;
use crate::error::{ForumError, Result};
use crate::types::{CategoryId, CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A discussion post with its likes and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique post identifier
    pub id: PostId,
    /// Category the post belongs to
    pub category_id: CategoryId,
    /// Post title
    pub title: String,
    /// Post body
    pub content: String,
    /// Author identifier at creation time
    pub author_id: UserId,
    /// Author display name at creation time
    pub author_name: String,
    /// Tags for categorization
    #[serde(default)]
    pub tags: Vec<String>,
    /// Attached files
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// When the post was created
    pub created_at: DateTime<Utc>,
    /// When the post was last edited
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Users who liked the post
    #[serde(default)]
    pub liked_by: BTreeSet<UserId>,
    /// Always `liked_by.len()`
    #[serde(default)]
    pub like_count: usize,
    /// Top-level comments in arrival order
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Always the number of comments in the tree, replies included
    #[serde(default)]
    pub comment_count: usize,
}

impl Post {
    /// Check if a user liked this post
    pub fn is_liked_by(&self, user_id: &UserId) -> bool {
        self.liked_by.contains(user_id)
    }

    /// Add a like. Returns false if the user already liked the post.
    pub fn add_like(&mut self, user_id: UserId) -> bool {
        if !self.liked_by.insert(user_id) {
            return false;
        }
        self.like_count += 1;
        true
    }

    /// Remove a like. Returns false if the user had not liked the post.
    pub fn remove_like(&mut self, user_id: &UserId) -> bool {
        if !self.liked_by.remove(user_id) {
            return false;
        }
        self.like_count = self.like_count.saturating_sub(1);
        true
    }

    /// Find a comment anywhere in the tree
    pub fn find_comment(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find_map(|c| {
            if &c.id == id {
                Some(c)
            } else {
                c.replies.iter().find(|r| &r.id == id)
            }
        })
    }

    /// Find a top-level comment
    pub fn find_top_level(&self, id: &CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| &c.id == id)
    }

    /// Check if an id is already used in the tree
    pub fn contains_comment(&self, id: &CommentId) -> bool {
        self.find_comment(id).is_some()
    }

    /// Attach a comment to the tree and count it
    ///
    /// A comment without a parent goes to the end of the top-level list; a
    /// reply goes to the end of its parent's replies. The parent must be a
    /// top-level comment of this post.
    pub fn attach_comment(&mut self, comment: Comment) -> Result<()> {
        if comment.post_id != self.id {
            return Err(ForumError::Validation(format!(
                "Comment {} belongs to post {}, not {}",
                comment.id, comment.post_id, self.id
            )));
        }
        if !comment.replies.is_empty() {
            return Err(ForumError::Validation(
                "A new comment cannot carry replies".to_string(),
            ));
        }

        match comment.parent_id.clone() {
            Some(parent_id) => {
                let parent = self
                    .comments
                    .iter_mut()
                    .find(|c| c.id == parent_id)
                    .ok_or_else(|| ForumError::CommentNotFound(parent_id.to_string()))?;
                parent.replies.push(comment);
            }
            None => self.comments.push(comment),
        }

        self.comment_count += 1;
        Ok(())
    }

    /// Edit the content of any comment in the tree
    pub fn edit_comment(&mut self, id: &CommentId, content: impl Into<String>) -> Result<&Comment> {
        let comment = self
            .find_comment_mut(id)
            .ok_or_else(|| ForumError::CommentNotFound(id.to_string()))?;
        comment.update_content(content);
        Ok(&*comment)
    }

    /// Position of a comment: index of its top-level ancestor, and its index
    /// among that ancestor's replies if it is a reply
    fn locate(&self, id: &CommentId) -> Option<(usize, Option<usize>)> {
        self.comments.iter().enumerate().find_map(|(i, c)| {
            if &c.id == id {
                Some((i, None))
            } else {
                c.replies
                    .iter()
                    .position(|r| &r.id == id)
                    .map(|j| (i, Some(j)))
            }
        })
    }

    fn find_comment_mut(&mut self, id: &CommentId) -> Option<&mut Comment> {
        let (top, reply) = self.locate(id)?;
        let parent = &mut self.comments[top];
        Some(match reply {
            Some(j) => &mut parent.replies[j],
            None => parent,
        })
    }

    /// Remove a comment and uncount it
    ///
    /// Removing a top-level comment removes its replies with it. Returns the
    /// removed comment; `comment_count` drops by its subtree size.
    pub fn remove_comment(&mut self, id: &CommentId) -> Result<Comment> {
        let (top, reply) = self
            .locate(id)
            .ok_or_else(|| ForumError::CommentNotFound(id.to_string()))?;

        let removed = match reply {
            Some(j) => self.comments[top].replies.remove(j),
            None => self.comments.remove(top),
        };
        self.comment_count = self.comment_count.saturating_sub(removed.subtree_size());
        Ok(removed)
    }

    /// Number of comments actually in the tree
    pub fn tree_size(&self) -> usize {
        self.comments.iter().map(Comment::subtree_size).sum()
    }

    /// Check both counters against their collections
    pub fn counters_consistent(&self) -> bool {
        self.like_count == self.liked_by.len() && self.comment_count == self.tree_size()
    }

    /// Recompute counters from the collections. Returns true if any changed.
    pub fn repair_counters(&mut self) -> bool {
        let likes = self.liked_by.len();
        let comments = self.tree_size();
        let changed = self.like_count != likes || self.comment_count != comments;
        self.like_count = likes;
        self.comment_count = comments;
        changed
    }

    /// Bring a loaded tree back to two levels
    ///
    /// Replies nested under a reply are lifted into their top-level
    /// ancestor's reply list in depth-first order. Every reply is relinked to
    /// the top-level comment that holds it, top-level comments lose any
    /// parent, and every comment is pointed at this post. Returns true if
    /// anything changed.
    pub fn normalize_tree(&mut self) -> bool {
        let post_id = self.id;
        let mut changed = false;

        for top in &mut self.comments {
            changed |= top.parent_id.take().is_some();
            if top.post_id != post_id {
                top.post_id = post_id;
                changed = true;
            }

            let mut pending = std::mem::take(&mut top.replies);
            pending.reverse();
            let mut flat = Vec::with_capacity(pending.len());
            while let Some(mut reply) = pending.pop() {
                let nested = std::mem::take(&mut reply.replies);
                if !nested.is_empty() {
                    changed = true;
                    pending.extend(nested.into_iter().rev());
                }
                if reply.parent_id.as_ref() != Some(&top.id) {
                    reply.parent_id = Some(top.id.clone());
                    changed = true;
                }
                if reply.post_id != post_id {
                    reply.post_id = post_id;
                    changed = true;
                }
                flat.push(reply);
            }
            top.replies = flat;
        }

        changed
    }

    /// First comment id that appears more than once in the tree
    pub fn duplicate_comment_id(&self) -> Option<&CommentId> {
        let mut seen = HashSet::new();
        self.all_comments()
            .map(|c| &c.id)
            .find(|id| !seen.insert(*id))
    }

    /// Check if the post matches a text query (case-insensitive)
    pub fn matches_text(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query) || self.content.to_lowercase().contains(&query)
    }

    /// Check if the post carries a tag (case-insensitive)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Iterate over every comment in the tree, parents before their replies
    pub fn all_comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments
            .iter()
            .flat_map(|c| std::iter::once(c).chain(c.replies.iter()))
    }

    /// Get post summary
    pub fn info(&self) -> PostInfo {
        PostInfo::from(self)
    }
}

/// Summary of a post for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostInfo {
    pub id: PostId,
    pub category_id: CategoryId,
    pub title: String,
    pub author_name: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub like_count: usize,
    pub comment_count: usize,
}

impl From<&Post> for PostInfo {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            category_id: post.category_id,
            title: post.title.clone(),
            author_name: post.author_name.clone(),
            tags: post.tags.clone(),
            created_at: post.created_at,
            like_count: post.like_count,
            comment_count: post.comment_count,
        }
    }
}
