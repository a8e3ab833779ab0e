//! Category directory
//!
//! Categories are read-only input to the engine. Post creation trusts the
//! category id it is given; callers check it against a directory first.

use crate::types::CategoryId;
use serde::{Deserialize, Serialize};

/// A category posts are filed under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
}

impl Category {
    /// Create a category
    pub fn new(id: u32, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: CategoryId(id),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A category with its live post count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(flatten)]
    pub category: Category,
    pub post_count: usize,
}

/// Source of categories
pub trait CategoryDirectory: Send + Sync {
    /// All categories, in display order
    fn categories(&self) -> Vec<Category>;

    /// Look up one category
    fn get(&self, id: CategoryId) -> Option<Category> {
        self.categories().into_iter().find(|c| c.id == id)
    }

    /// Check if a category exists
    fn contains(&self, id: CategoryId) -> bool {
        self.get(id).is_some()
    }
}

/// Fixed category list
#[derive(Debug, Clone)]
pub struct StaticCategories {
    categories: Vec<Category>,
}

impl StaticCategories {
    /// Create a directory from a list
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }
}

impl Default for StaticCategories {
    /// The forum's standard categories
    fn default() -> Self {
        Self::new(vec![
            Category::new(1, "General Discussion", "General topics and conversations"),
            Category::new(2, "Technology", "Tech news and discussions"),
            Category::new(3, "Programming", "Coding and development topics"),
            Category::new(4, "Design", "UI/UX and graphic design"),
            Category::new(5, "Career", "Job search and career advice"),
            Category::new(6, "Hobbies", "Share your hobbies and interests"),
        ])
    }
}

impl CategoryDirectory for StaticCategories {
    fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    fn get(&self, id: CategoryId) -> Option<Category> {
        self.categories.iter().find(|c| c.id == id).cloned()
    }
}
