//! Post listing filters

use super::model::Post;
use crate::types::{CategoryId, UserId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Order of a post listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Newest first (collection order)
    #[default]
    Recent,
    /// Most liked first, newest first among equals
    Popular,
}

/// Filter criteria for post listings
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    /// Only posts in this category
    pub category_id: Option<CategoryId>,
    /// Only posts by this author
    pub author_id: Option<UserId>,
    /// Only posts with this tag
    pub tag: Option<String>,
    /// Only posts whose title or body contains this text
    pub text: Option<String>,
    /// Result order
    pub sort: SortOrder,
    /// Maximum number of results
    pub limit: Option<usize>,
}

impl PostFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by category
    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Filter by author
    pub fn with_author(mut self, author_id: impl Into<UserId>) -> Self {
        self.author_id = Some(author_id.into());
        self
    }

    /// Filter by tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Filter by text
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the order
    pub fn sorted_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Cap the number of results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check if a post matches this filter
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(category_id) = self.category_id {
            if post.category_id != category_id {
                return false;
            }
        }

        if let Some(ref author_id) = self.author_id {
            if &post.author_id != author_id {
                return false;
            }
        }

        if let Some(ref tag) = self.tag {
            if !post.has_tag(tag) {
                return false;
            }
        }

        if let Some(ref text) = self.text {
            if text.trim().is_empty() || !post.matches_text(text.trim()) {
                return false;
            }
        }

        true
    }

    /// Select, order and cap posts from a recency-ordered collection
    pub fn apply(&self, posts: &[Post]) -> Vec<Post> {
        let mut selected: Vec<(usize, &Post)> = posts
            .iter()
            .enumerate()
            .filter(|(_, p)| self.matches(p))
            .collect();

        if self.sort == SortOrder::Popular {
            // stable on collection position, so equal like counts stay newest first
            selected.sort_by_key(|(pos, p)| (Reverse(p.like_count), *pos));
        }

        let limit = self.limit.unwrap_or(usize::MAX);
        selected
            .into_iter()
            .take(limit)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::model::tests::create_test_post;

    fn collection() -> Vec<Post> {
        let mut newest = create_test_post(3);
        newest.category_id = CategoryId(3);
        newest.title = "Getting Started with TypeScript".to_string();
        newest.tags = vec!["typescript".to_string()];

        let mut middle = create_test_post(2);
        middle.category_id = CategoryId(3);
        middle.title = "React Best Practices".to_string();
        middle.author_id = UserId::new("john");
        middle.add_like(UserId::new("u1"));
        middle.add_like(UserId::new("u2"));

        let mut oldest = create_test_post(1);
        oldest.title = "Welcome".to_string();
        oldest.add_like(UserId::new("u1"));

        vec![newest, middle, oldest]
    }

    fn ids(posts: &[Post]) -> Vec<u64> {
        posts.iter().map(|p| p.id.0).collect()
    }

    #[test]
    fn test_empty_filter_keeps_order() {
        let posts = collection();
        assert_eq!(ids(&PostFilter::new().apply(&posts)), vec![3, 2, 1]);
    }

    #[test]
    fn test_filter_by_category() {
        let posts = collection();
        let filter = PostFilter::new().with_category(CategoryId(3));
        assert_eq!(ids(&filter.apply(&posts)), vec![3, 2]);
    }

    #[test]
    fn test_filter_by_author_and_tag() {
        let posts = collection();
        assert_eq!(ids(&PostFilter::new().with_author("john").apply(&posts)), vec![2]);
        assert_eq!(ids(&PostFilter::new().with_tag("TypeScript").apply(&posts)), vec![3]);
    }

    #[test]
    fn test_filter_by_text() {
        let posts = collection();
        assert_eq!(ids(&PostFilter::new().with_text("react").apply(&posts)), vec![2]);
        assert!(PostFilter::new().with_text("   ").apply(&posts).is_empty());
    }

    #[test]
    fn test_popular_order_and_limit() {
        let posts = collection();
        let filter = PostFilter::new().sorted_by(SortOrder::Popular);
        assert_eq!(ids(&filter.apply(&posts)), vec![2, 1, 3]);

        let filter = PostFilter::new().sorted_by(SortOrder::Popular).limit(1);
        assert_eq!(ids(&filter.apply(&posts)), vec![2]);
    }

    #[test]
    fn test_popular_ties_stay_newest_first() {
        let posts = vec![create_test_post(5), create_test_post(4), create_test_post(3)];
        let filter = PostFilter::new().sorted_by(SortOrder::Popular);
        assert_eq!(ids(&filter.apply(&posts)), vec![5, 4, 3]);
    }
}
