//! Post storage trait and abstractions

use crate::error::Result;
use crate::post::Post;

/// Trait for post collection storage implementations
///
/// The collection is kept most recent first. `save_all` replaces whatever
/// was stored before; after it returns, `load_all` must see the new state.
pub trait PostStorage: Send + Sync {
    /// Load every post, most recent first
    fn load_all(&self) -> Result<Vec<Post>>;

    /// Replace the stored collection
    fn save_all(&self, posts: &[Post]) -> Result<()>;
}

/// In-memory storage, for tests and embedding
pub mod memory {
    use super::*;
    use std::sync::{PoisonError, RwLock};

    /// In-memory post storage
    #[derive(Default)]
    pub struct MemoryStorage {
        posts: RwLock<Vec<Post>>,
    }

    impl MemoryStorage {
        /// Create an empty in-memory storage
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a storage that already holds posts
        pub fn with_posts(posts: Vec<Post>) -> Self {
            Self {
                posts: RwLock::new(posts),
            }
        }
    }

    impl PostStorage for MemoryStorage {
        fn load_all(&self) -> Result<Vec<Post>> {
            let posts = self.posts.read().unwrap_or_else(PoisonError::into_inner);
            Ok(posts.clone())
        }

        fn save_all(&self, posts: &[Post]) -> Result<()> {
            let mut stored = self.posts.write().unwrap_or_else(PoisonError::into_inner);
            *stored = posts.to_vec();
            Ok(())
        }
    }

}
