//! Forum engine: the single entry point for every post mutation

use super::activity::UserActivity;
use super::persistence::PostStorage;
use crate::category::{CategoryDirectory, CategorySummary};
use crate::comment::{Comment, CommentDraft};
use crate::config::Config;
use crate::error::{ForumError, Result};
use crate::post::{Post, PostDraft, PostFilter, PostUpdate, SortOrder};
use crate::types::{CategoryId, CommentId, PostId, UserId};
use crate::validator::ContentValidator;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Result of applying an operation to a post
enum Change<T> {
    /// The post was modified and must be persisted
    Changed(T),
    /// Nothing to persist
    Unchanged(T),
}

struct ForumState {
    /// Posts, most recent first
    posts: Vec<Post>,
    /// Highest post id handed out by this engine or seen on load
    last_post_id: PostId,
}

/// Owner of the post collection
///
/// All mutations hold the write lock across the whole
/// change-then-persist cycle and are applied to a copy of the post first,
/// so a failed validation, lookup or save leaves the state untouched.
/// Reads return owned snapshots.
pub struct ForumEngine {
    /// Storage backend
    storage: Arc<dyn PostStorage>,
    /// In-memory copy of the collection
    state: RwLock<ForumState>,
    /// Content rules
    validator: ContentValidator,
}

impl ForumEngine {
    /// Open an engine over the given storage
    pub fn open(storage: impl PostStorage + 'static) -> Result<Self> {
        Self::with_storage(Arc::new(storage))
    }

    /// Open an engine over shared storage
    pub fn with_storage(storage: Arc<dyn PostStorage>) -> Result<Self> {
        let mut posts = storage.load_all()?;

        let mut seen = HashSet::new();
        let mut repaired = 0;
        for post in &mut posts {
            if !seen.insert(post.id) {
                return Err(ForumError::Validation(format!(
                    "Stored data holds post {} more than once",
                    post.id
                )));
            }
            if let Some(id) = post.duplicate_comment_id() {
                return Err(ForumError::Validation(format!(
                    "Stored post {} holds comment {} more than once",
                    post.id, id
                )));
            }
            if post.normalize_tree() {
                warn!("Flattened comment tree on post {}", post.id);
            }
            if post.repair_counters() {
                warn!("Repaired drifted counters on post {}", post.id);
                repaired += 1;
            }
        }

        let last_post_id = posts.iter().map(|p| p.id).max().unwrap_or(PostId(0));
        info!(
            "Loaded {} posts ({} with repaired counters)",
            posts.len(),
            repaired
        );

        Ok(Self {
            storage,
            state: RwLock::new(ForumState {
                posts,
                last_post_id,
            }),
            validator: ContentValidator::new(),
        })
    }

    /// Open an engine using the limits from a configuration
    pub fn from_config(storage: Arc<dyn PostStorage>, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_storage(storage)?
            .with_validator(ContentValidator::with_limits(config.limits.clone())))
    }

    /// Replace the content validator
    pub fn with_validator(mut self, validator: ContentValidator) -> Self {
        self.validator = validator;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, ForumState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ForumState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `op` to a copy of one post, persist, then commit the copy
    fn mutate<T>(
        &self,
        post_id: PostId,
        op: impl FnOnce(&mut Post) -> Result<Change<T>>,
    ) -> Result<T> {
        let mut state = self.write();
        let index = state
            .posts
            .iter()
            .position(|p| p.id == post_id)
            .ok_or(ForumError::PostNotFound(post_id))?;

        let mut updated = state.posts[index].clone();
        match op(&mut updated)? {
            Change::Unchanged(value) => Ok(value),
            Change::Changed(value) => {
                debug_assert!(updated.counters_consistent());
                let previous = std::mem::replace(&mut state.posts[index], updated);
                if let Err(err) = self.storage.save_all(&state.posts) {
                    state.posts[index] = previous;
                    return Err(err.with_context(format!("Failed to save post {}", post_id)));
                }
                Ok(value)
            }
        }
    }

    // ----- posts -----

    /// Create a post at the head of the collection
    pub fn create_post(&self, draft: PostDraft) -> Result<Post> {
        self.validator.validate_title(&draft.title)?;
        self.validator.validate_content(&draft.content)?;
        let tags = self.validator.normalize_tags(&draft.tags)?;

        let mut state = self.write();
        let id = state.last_post_id.next()?;
        let post = draft.into_post(id, tags);

        state.posts.insert(0, post.clone());
        if let Err(err) = self.storage.save_all(&state.posts) {
            state.posts.remove(0);
            return Err(err.with_context("Failed to save new post"));
        }
        state.last_post_id = id;

        info!("Created post {} in category {}", id, post.category_id);
        Ok(post)
    }

    /// Get a post by ID
    pub fn get_post(&self, post_id: PostId) -> Result<Post> {
        self.read()
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
            .ok_or(ForumError::PostNotFound(post_id))
    }

    /// Delete a post together with its comment tree
    pub fn delete_post(&self, post_id: PostId) -> Result<Post> {
        let mut state = self.write();
        let index = state
            .posts
            .iter()
            .position(|p| p.id == post_id)
            .ok_or(ForumError::PostNotFound(post_id))?;

        let removed = state.posts.remove(index);
        if let Err(err) = self.storage.save_all(&state.posts) {
            state.posts.insert(index, removed);
            return Err(err.with_context(format!("Failed to delete post {}", post_id)));
        }

        info!(
            "Deleted post {} with {} comments",
            post_id, removed.comment_count
        );
        Ok(removed)
    }

    /// Edit a post's title, body or tags
    pub fn update_post(&self, post_id: PostId, update: PostUpdate) -> Result<Post> {
        self.mutate(post_id, |post| {
            if update.is_empty() {
                return Ok(Change::Unchanged(post.clone()));
            }
            if let Some(ref title) = update.title {
                self.validator.validate_title(title)?;
            }
            if let Some(ref content) = update.content {
                self.validator.validate_content(content)?;
            }
            let tags = match update.tags {
                Some(ref tags) => Some(self.validator.normalize_tags(tags)?),
                None => None,
            };

            if let Some(title) = update.title {
                post.title = title.trim().to_string();
            }
            if let Some(content) = update.content {
                post.content = content;
            }
            if let Some(tags) = tags {
                post.tags = tags;
            }
            post.updated_at = Some(Utc::now());

            debug!("Updated post {}", post.id);
            Ok(Change::Changed(post.clone()))
        })
    }

    // ----- likes -----

    /// Like a post. Liking twice is a no-op. Returns the like count.
    pub fn like(&self, post_id: PostId, user_id: &UserId) -> Result<usize> {
        self.mutate(post_id, |post| {
            if post.add_like(user_id.clone()) {
                debug!("User {} liked post {}", user_id, post.id);
                Ok(Change::Changed(post.like_count))
            } else {
                Ok(Change::Unchanged(post.like_count))
            }
        })
    }

    /// Remove a like. Unliking without a like is a no-op. Returns the like count.
    pub fn unlike(&self, post_id: PostId, user_id: &UserId) -> Result<usize> {
        self.mutate(post_id, |post| {
            if post.remove_like(user_id) {
                debug!("User {} unliked post {}", user_id, post.id);
                Ok(Change::Changed(post.like_count))
            } else {
                Ok(Change::Unchanged(post.like_count))
            }
        })
    }

    /// Check if a user liked a post
    pub fn has_liked(&self, post_id: PostId, user_id: &UserId) -> Result<bool> {
        self.read()
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .map(|p| p.is_liked_by(user_id))
            .ok_or(ForumError::PostNotFound(post_id))
    }

    // ----- comments -----

    /// Add a top-level comment or a reply to a top-level comment
    pub fn add_comment(&self, post_id: PostId, draft: CommentDraft) -> Result<Comment> {
        self.mutate(post_id, |post| {
            self.validator.validate_comment(&draft.content)?;

            let mut id = CommentId::new();
            while post.contains_comment(&id) {
                id = CommentId::new();
            }

            let comment = draft.into_comment(id, post.id);
            post.attach_comment(comment.clone())?;

            debug!(
                "Added comment {} to post {} ({} total)",
                comment.id, post.id, post.comment_count
            );
            Ok(Change::Changed(comment))
        })
    }

    /// Snapshot of a post's comment tree
    pub fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        self.read()
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .map(|p| p.comments.clone())
            .ok_or(ForumError::PostNotFound(post_id))
    }

    /// Edit a comment's content
    pub fn update_comment(
        &self,
        post_id: PostId,
        comment_id: &CommentId,
        content: impl Into<String>,
    ) -> Result<Comment> {
        let content = content.into();
        self.mutate(post_id, |post| {
            self.validator.validate_comment(&content)?;
            let comment = post.edit_comment(comment_id, content)?.clone();
            debug!("Edited comment {} on post {}", comment_id, post_id);
            Ok(Change::Changed(comment))
        })
    }

    /// Delete a comment; a top-level comment takes its replies with it.
    /// Returns the number of comments removed.
    pub fn delete_comment(&self, post_id: PostId, comment_id: &CommentId) -> Result<usize> {
        self.mutate(post_id, |post| {
            let removed = post.remove_comment(comment_id)?;
            let count = removed.subtree_size();
            debug!(
                "Deleted comment {} from post {} ({} removed)",
                comment_id, post_id, count
            );
            Ok(Change::Changed(count))
        })
    }

    // ----- queries -----

    /// Newest posts first
    pub fn recent_posts(&self, limit: usize) -> Vec<Post> {
        self.query(&PostFilter::new().limit(limit))
    }

    /// Most liked posts first
    pub fn popular_posts(&self, limit: usize) -> Vec<Post> {
        self.query(&PostFilter::new().sorted_by(SortOrder::Popular).limit(limit))
    }

    /// Posts in one category, newest first
    pub fn posts_in_category(&self, category_id: CategoryId) -> Vec<Post> {
        self.query(&PostFilter::new().with_category(category_id))
    }

    /// Posts whose title or body contains `query`; a blank query finds nothing
    pub fn search_posts(&self, query: &str) -> Vec<Post> {
        self.query(&PostFilter::new().with_text(query))
    }

    /// Posts matching a filter
    pub fn query(&self, filter: &PostFilter) -> Vec<Post> {
        filter.apply(&self.read().posts)
    }

    /// Get post count
    pub fn post_count(&self) -> usize {
        self.read().posts.len()
    }

    /// Categories with their live post counts
    pub fn categories_with_counts(&self, directory: &dyn CategoryDirectory) -> Vec<CategorySummary> {
        let state = self.read();
        directory
            .categories()
            .into_iter()
            .map(|category| {
                let post_count = state
                    .posts
                    .iter()
                    .filter(|p| p.category_id == category.id)
                    .count();
                CategorySummary {
                    category,
                    post_count,
                }
            })
            .collect()
    }

    /// A user's activity totals
    pub fn user_activity(&self, user_id: &UserId) -> UserActivity {
        UserActivity::collect(user_id, &self.read().posts)
    }

    /// Get access to the underlying storage
    pub fn storage(&self) -> &dyn PostStorage {
        self.storage.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::StaticCategories;
    use crate::engine::persistence::memory::MemoryStorage;
    use crate::post::model::tests::create_test_post;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn create_engine() -> ForumEngine {
        ForumEngine::open(MemoryStorage::new()).unwrap()
    }

    fn draft(title: &str) -> PostDraft {
        PostDraft::new(CategoryId(1), "author", "Author", title, "Body text")
    }

    fn user(id: &str) -> UserId {
        UserId::new(id)
    }

    /// Storage whose writes can be switched off
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        failing: AtomicBool,
    }

    impl PostStorage for FlakyStorage {
        fn load_all(&self) -> Result<Vec<Post>> {
            self.inner.load_all()
        }

        fn save_all(&self, posts: &[Post]) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ForumError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "disk full",
                )));
            }
            self.inner.save_all(posts)
        }
    }

    #[test]
    fn test_create_post() {
        let engine = create_engine();
        let post = engine
            .create_post(draft("Hello").tags(["rust", " ", "Rust"]))
            .unwrap();

        assert_eq!(post.id, PostId(1));
        assert_eq!(post.like_count, 0);
        assert_eq!(post.comment_count, 0);
        assert_eq!(post.tags, vec!["rust".to_string()]);
        assert_eq!(engine.get_post(post.id).unwrap(), post);
        assert_eq!(engine.storage().load_all().unwrap(), vec![post]);
    }

    #[test]
    fn test_create_post_validation() {
        let engine = create_engine();
        let blank_title = PostDraft::new(CategoryId(1), "u", "U", "   ", "Body");
        let blank_body = PostDraft::new(CategoryId(1), "u", "U", "Title", "\n");

        assert!(engine.create_post(blank_title).unwrap_err().is_validation());
        assert!(engine.create_post(blank_body).unwrap_err().is_validation());
        assert_eq!(engine.post_count(), 0);
    }

    #[test]
    fn test_new_posts_go_to_head() {
        let engine = create_engine();
        let first = engine.create_post(draft("First")).unwrap();
        let second = engine.create_post(draft("Second")).unwrap();
        assert!(second.id > first.id);

        let recent: Vec<_> = engine.recent_posts(10).into_iter().map(|p| p.id).collect();
        assert_eq!(recent, vec![second.id, first.id]);
    }

    #[test]
    fn test_post_ids_not_reused_after_delete() {
        let engine = create_engine();
        engine.create_post(draft("One")).unwrap();
        let two = engine.create_post(draft("Two")).unwrap();
        engine.delete_post(two.id).unwrap();

        let three = engine.create_post(draft("Three")).unwrap();
        assert_eq!(three.id, PostId(3));
    }

    #[test]
    fn test_ids_continue_after_reload() {
        let storage = MemoryStorage::with_posts(vec![create_test_post(7), create_test_post(4)]);
        let engine = ForumEngine::open(storage).unwrap();
        let post = engine.create_post(draft("Next")).unwrap();
        assert_eq!(post.id, PostId(8));
    }

    #[test]
    fn test_scenario_likes() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();

        assert_eq!(engine.like(post.id, &user("u1")).unwrap(), 1);
        assert_eq!(engine.like(post.id, &user("u1")).unwrap(), 1);
        assert_eq!(engine.unlike(post.id, &user("u1")).unwrap(), 0);
        assert_eq!(engine.unlike(post.id, &user("u1")).unwrap(), 0);
    }

    #[test]
    fn test_like_idempotent() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();
        engine.like(post.id, &user("u1")).unwrap();
        engine.like(post.id, &user("u1")).unwrap();

        let post = engine.get_post(post.id).unwrap();
        assert_eq!(post.like_count, 1);
        assert_eq!(post.liked_by.iter().filter(|u| u.as_str() == "u1").count(), 1);
        assert!(engine.has_liked(post.id, &user("u1")).unwrap());
    }

    #[test]
    fn test_unlike_never_negative() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();
        engine.like(post.id, &user("u2")).unwrap();

        for _ in 0..3 {
            assert_eq!(engine.unlike(post.id, &user("never")).unwrap(), 1);
        }
        assert!(engine.get_post(post.id).unwrap().counters_consistent());
    }

    #[test]
    fn test_like_unlike_round_trip() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();
        engine.like(post.id, &user("a")).unwrap();
        let before = engine.get_post(post.id).unwrap();

        engine.like(post.id, &user("b")).unwrap();
        engine.unlike(post.id, &user("b")).unwrap();

        let after = engine.get_post(post.id).unwrap();
        assert_eq!(after.like_count, before.like_count);
        assert_eq!(after.liked_by, before.liked_by);
    }

    #[test]
    fn test_like_missing_post() {
        let engine = create_engine();
        assert!(engine.like(PostId(9), &user("u1")).unwrap_err().is_not_found());
        assert!(engine.unlike(PostId(9), &user("u1")).unwrap_err().is_not_found());
        assert!(engine.has_liked(PostId(9), &user("u1")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_scenario_comment_and_reply() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();

        let c1 = engine
            .add_comment(post.id, CommentDraft::new("a1", "Alice", "hi"))
            .unwrap();
        assert_eq!(engine.get_post(post.id).unwrap().comment_count, 1);

        let r1 = engine
            .add_comment(
                post.id,
                CommentDraft::new("a2", "Bob", "nice").reply_to(c1.id.clone()),
            )
            .unwrap();
        assert_eq!(r1.parent_id, Some(c1.id.clone()));

        let post = engine.get_post(post.id).unwrap();
        assert_eq!(post.comment_count, 2);

        let comments = engine.list_comments(post.id).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, c1.id);
        assert_eq!(comments[0].replies, vec![r1]);
    }

    #[test]
    fn test_scenario_orphan_reply_rejected() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();
        let c1 = engine
            .add_comment(post.id, CommentDraft::new("a1", "Alice", "hi"))
            .unwrap();
        engine
            .add_comment(post.id, CommentDraft::new("a2", "Bob", "nice").reply_to(c1.id))
            .unwrap();
        let before = engine.list_comments(post.id).unwrap();

        let err = engine
            .add_comment(
                post.id,
                CommentDraft::new("a3", "Eve", "x").reply_to(CommentId::new()),
            )
            .unwrap_err();
        assert!(err.is_not_found());

        assert_eq!(engine.get_post(post.id).unwrap().comment_count, 2);
        assert_eq!(engine.list_comments(post.id).unwrap(), before);
    }

    #[test]
    fn test_reply_to_reply_rejected() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();
        let c1 = engine
            .add_comment(post.id, CommentDraft::new("a1", "Alice", "hi"))
            .unwrap();
        let r1 = engine
            .add_comment(post.id, CommentDraft::new("a2", "Bob", "re").reply_to(c1.id))
            .unwrap();

        let err = engine
            .add_comment(post.id, CommentDraft::new("a3", "Eve", "re re").reply_to(r1.id))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(engine.get_post(post.id).unwrap().comment_count, 2);
    }

    #[test]
    fn test_reply_appended_at_tail() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();
        let parent = engine
            .add_comment(post.id, CommentDraft::new("a", "A", "parent"))
            .unwrap();
        for text in ["one", "two", "three"] {
            engine
                .add_comment(post.id, CommentDraft::new("b", "B", text).reply_to(parent.id.clone()))
                .unwrap();
        }

        let comments = engine.list_comments(post.id).unwrap();
        let replies: Vec<_> = comments[0].replies.iter().map(|r| r.content.as_str()).collect();
        assert_eq!(replies, vec!["one", "two", "three"]);
        assert_eq!(comments.len(), 1);
    }

    #[test]
    fn test_comment_counter_consistency() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();

        let mut parents = Vec::new();
        for i in 0..4 {
            let c = engine
                .add_comment(post.id, CommentDraft::new("a", "A", format!("top {}", i)))
                .unwrap();
            parents.push(c.id);
        }
        for (i, parent) in parents.iter().enumerate() {
            for j in 0..i {
                engine
                    .add_comment(
                        post.id,
                        CommentDraft::new("b", "B", format!("reply {}", j)).reply_to(parent.clone()),
                    )
                    .unwrap();
            }
        }

        let post = engine.get_post(post.id).unwrap();
        assert_eq!(post.comment_count, 4 + 6);
        assert_eq!(post.comment_count, post.tree_size());
    }

    #[test]
    fn test_blank_comment_rejected() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();
        let err = engine
            .add_comment(post.id, CommentDraft::new("a", "A", "   "))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(engine.get_post(post.id).unwrap().comment_count, 0);
    }

    #[test]
    fn test_comment_on_missing_post() {
        let engine = create_engine();
        let err = engine
            .add_comment(PostId(3), CommentDraft::new("a", "A", ""))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_scenario_delete_then_list() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();
        engine
            .add_comment(post.id, CommentDraft::new("a", "A", "hi"))
            .unwrap();

        let removed = engine.delete_post(post.id).unwrap();
        assert_eq!(removed.comment_count, 1);

        assert!(engine.list_comments(post.id).unwrap_err().is_not_found());
        assert!(engine.get_post(post.id).unwrap_err().is_not_found());
        assert!(engine.delete_post(post.id).unwrap_err().is_not_found());
        assert!(engine.storage().load_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_comments_is_snapshot() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();
        engine
            .add_comment(post.id, CommentDraft::new("a", "A", "first"))
            .unwrap();

        let snapshot = engine.list_comments(post.id).unwrap();
        engine
            .add_comment(post.id, CommentDraft::new("a", "A", "second"))
            .unwrap();

        assert_eq!(snapshot.len(), 1);
        assert_eq!(engine.list_comments(post.id).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_comment_counts() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();
        let top = engine
            .add_comment(post.id, CommentDraft::new("a", "A", "top"))
            .unwrap();
        let reply = engine
            .add_comment(post.id, CommentDraft::new("b", "B", "r1").reply_to(top.id.clone()))
            .unwrap();
        engine
            .add_comment(post.id, CommentDraft::new("b", "B", "r2").reply_to(top.id.clone()))
            .unwrap();
        engine
            .add_comment(post.id, CommentDraft::new("c", "C", "other"))
            .unwrap();

        assert_eq!(engine.delete_comment(post.id, &reply.id).unwrap(), 1);
        assert_eq!(engine.get_post(post.id).unwrap().comment_count, 3);

        assert_eq!(engine.delete_comment(post.id, &top.id).unwrap(), 2);
        let post = engine.get_post(post.id).unwrap();
        assert_eq!(post.comment_count, 1);
        assert!(post.counters_consistent());

        assert!(engine
            .delete_comment(post.id, &top.id)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_update_comment() {
        let engine = create_engine();
        let post = engine.create_post(draft("P")).unwrap();
        let top = engine
            .add_comment(post.id, CommentDraft::new("a", "A", "typo"))
            .unwrap();

        let edited = engine.update_comment(post.id, &top.id, "fixed").unwrap();
        assert_eq!(edited.content, "fixed");
        assert!(edited.is_edited());
        assert!(engine
            .update_comment(post.id, &top.id, "  ")
            .unwrap_err()
            .is_validation());
        assert_eq!(engine.list_comments(post.id).unwrap()[0].content, "fixed");
    }

    #[test]
    fn test_update_post() {
        let engine = create_engine();
        let post = engine.create_post(draft("Old")).unwrap();
        engine.like(post.id, &user("u1")).unwrap();

        let updated = engine
            .update_post(post.id, PostUpdate::new().title(" New ").tags(["a"]))
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.content, "Body text");
        assert_eq!(updated.tags, vec!["a".to_string()]);
        assert_eq!(updated.like_count, 1);
        assert!(updated.updated_at.is_some());

        let err = engine
            .update_post(post.id, PostUpdate::new().title(""))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(engine.get_post(post.id).unwrap().title, "New");

        let unchanged = engine.update_post(post.id, PostUpdate::new()).unwrap();
        assert_eq!(unchanged, engine.get_post(post.id).unwrap());
    }

    #[test]
    fn test_failed_save_leaves_state_unchanged() {
        let storage = Arc::new(FlakyStorage::default());
        let engine = ForumEngine::with_storage(storage.clone()).unwrap();
        let post = engine.create_post(draft("P")).unwrap();
        let top = engine
            .add_comment(post.id, CommentDraft::new("a", "A", "hi"))
            .unwrap();

        storage.failing.store(true, Ordering::SeqCst);
        assert!(engine.like(post.id, &user("u1")).is_err());
        assert!(engine
            .add_comment(post.id, CommentDraft::new("a", "A", "lost"))
            .is_err());
        assert!(engine.delete_comment(post.id, &top.id).is_err());
        assert!(engine.delete_post(post.id).is_err());
        assert!(engine.create_post(draft("Q")).is_err());

        let current = engine.get_post(post.id).unwrap();
        assert_eq!(current.like_count, 0);
        assert_eq!(current.comment_count, 1);
        assert_eq!(engine.post_count(), 1);

        storage.failing.store(false, Ordering::SeqCst);
        let next = engine.create_post(draft("Q")).unwrap();
        assert_eq!(next.id, PostId(2));
    }

    #[test]
    fn test_unchanged_like_skips_save() {
        let storage = Arc::new(FlakyStorage::default());
        let engine = ForumEngine::with_storage(storage.clone()).unwrap();
        let post = engine.create_post(draft("P")).unwrap();
        engine.like(post.id, &user("u1")).unwrap();

        storage.failing.store(true, Ordering::SeqCst);
        assert_eq!(engine.like(post.id, &user("u1")).unwrap(), 1);
        assert_eq!(engine.unlike(post.id, &user("u2")).unwrap(), 1);
    }

    #[test]
    fn test_open_repairs_counters() {
        let mut drifted = create_test_post(1);
        drifted.like_count = 42;
        drifted.comment_count = 15;
        let engine = ForumEngine::open(MemoryStorage::with_posts(vec![drifted])).unwrap();

        let post = engine.get_post(PostId(1)).unwrap();
        assert_eq!(post.like_count, 0);
        assert_eq!(post.comment_count, 0);
    }

    #[test]
    fn test_open_flattens_nested_replies() {
        let mut post = create_test_post(1);
        let top = CommentDraft::new("a", "A", "top").into_comment(CommentId::new(), post.id);
        let top_id = top.id.clone();
        post.attach_comment(top).unwrap();
        let mut reply = CommentDraft::new("b", "B", "reply")
            .reply_to(top_id.clone())
            .into_comment(CommentId::new(), post.id);
        let nested = CommentDraft::new("c", "C", "nested")
            .reply_to(reply.id.clone())
            .into_comment(CommentId::new(), post.id);
        reply.replies.push(nested);
        post.comments[0].replies.push(reply);
        post.comment_count = 3;

        let engine = ForumEngine::open(MemoryStorage::with_posts(vec![post])).unwrap();
        let loaded = engine.get_post(PostId(1)).unwrap();
        assert_eq!(loaded.comment_count, 3);
        assert!(loaded.counters_consistent());

        let comments = engine.list_comments(PostId(1)).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].replies.len(), 2);
        assert!(comments[0].replies.iter().all(|r| {
            r.replies.is_empty() && r.parent_id.as_ref() == Some(&top_id)
        }));
    }

    #[test]
    fn test_open_rejects_duplicate_post_ids() {
        let storage = MemoryStorage::with_posts(vec![create_test_post(3), create_test_post(3)]);
        let err = ForumEngine::open(storage).err().unwrap();
        assert!(err.is_validation());
    }

    #[test]
    fn test_open_rejects_duplicate_comment_ids() {
        let mut post = create_test_post(1);
        let first = CommentDraft::new("a", "A", "one").into_comment(CommentId::new(), post.id);
        let mut second = CommentDraft::new("b", "B", "two").into_comment(CommentId::new(), post.id);
        second.id = first.id.clone();
        post.attach_comment(first).unwrap();
        post.attach_comment(second).unwrap();

        let err = ForumEngine::open(MemoryStorage::with_posts(vec![post])).err().unwrap();
        assert!(err.is_validation());
    }

    #[test]
    fn test_create_post_when_ids_exhausted() {
        let storage = MemoryStorage::with_posts(vec![create_test_post(u64::MAX)]);
        let engine = ForumEngine::open(storage).unwrap();

        let err = engine.create_post(draft("Overflow")).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(engine.post_count(), 1);
        assert_eq!(engine.storage().load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_state_survives_reopen() {
        let storage = Arc::new(MemoryStorage::new());
        {
            let engine = ForumEngine::with_storage(storage.clone()).unwrap();
            let post = engine.create_post(draft("P")).unwrap();
            engine.like(post.id, &user("u1")).unwrap();
            engine
                .add_comment(post.id, CommentDraft::new("a", "A", "hi"))
                .unwrap();
        }

        let engine = ForumEngine::with_storage(storage).unwrap();
        let post = engine.get_post(PostId(1)).unwrap();
        assert_eq!(post.like_count, 1);
        assert_eq!(post.comment_count, 1);
    }

    #[test]
    fn test_concurrent_likes_and_comments() {
        let engine = Arc::new(create_engine());
        let post_id = engine.create_post(draft("P")).unwrap().id;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                thread::spawn(move || {
                    for _ in 0..10 {
                        engine.like(post_id, &UserId::new(format!("u{}", i % 4))).unwrap();
                        engine
                            .add_comment(post_id, CommentDraft::new("t", "T", "ping"))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let post = engine.get_post(post_id).unwrap();
        assert_eq!(post.like_count, 4);
        assert_eq!(post.comment_count, 80);
        assert!(post.counters_consistent());
    }

    #[test]
    fn test_queries() {
        let engine = create_engine();
        let welcome = engine
            .create_post(PostDraft::new(CategoryId(1), "admin", "Admin", "Welcome", "Guidelines"))
            .unwrap();
        let react = engine
            .create_post(PostDraft::new(CategoryId(3), "john", "John", "React tips", "Hooks"))
            .unwrap();
        let ts = engine
            .create_post(PostDraft::new(CategoryId(3), "jane", "Jane", "TypeScript", "Types"))
            .unwrap();
        engine.like(react.id, &user("u1")).unwrap();
        engine.like(react.id, &user("u2")).unwrap();
        engine.like(welcome.id, &user("u1")).unwrap();

        let ids = |posts: Vec<Post>| posts.into_iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids(engine.recent_posts(2)), vec![ts.id, react.id]);
        assert_eq!(ids(engine.popular_posts(10)), vec![react.id, welcome.id, ts.id]);
        assert_eq!(ids(engine.posts_in_category(CategoryId(3))), vec![ts.id, react.id]);
        assert_eq!(ids(engine.search_posts("REACT")), vec![react.id]);
        assert!(engine.search_posts("").is_empty());
        assert_eq!(
            ids(engine.query(&PostFilter::new().with_author("jane"))),
            vec![ts.id]
        );
    }

    #[test]
    fn test_categories_with_counts() {
        let engine = create_engine();
        engine.create_post(draft("A")).unwrap();
        engine
            .create_post(PostDraft::new(CategoryId(3), "u", "U", "B", "Body"))
            .unwrap();
        engine
            .create_post(PostDraft::new(CategoryId(3), "u", "U", "C", "Body"))
            .unwrap();

        let summaries = engine.categories_with_counts(&StaticCategories::default());
        assert_eq!(summaries.len(), 6);
        assert_eq!(summaries[0].post_count, 1);
        assert_eq!(summaries[2].post_count, 2);
        assert_eq!(summaries[5].post_count, 0);
    }

    #[test]
    fn test_user_activity() {
        let engine = create_engine();
        let post = engine.create_post(draft("Mine")).unwrap();
        engine.like(post.id, &user("bob")).unwrap();
        engine
            .add_comment(post.id, CommentDraft::new("bob", "Bob", "hello"))
            .unwrap();

        let author = engine.user_activity(&user("author"));
        assert_eq!(author.posts_authored, 1);
        assert_eq!(author.likes_received, 1);

        let bob = engine.user_activity(&user("bob"));
        assert_eq!(bob.likes_given, 1);
        assert_eq!(bob.comments_authored, 1);
    }

    #[test]
    fn test_from_config_applies_limits() {
        let mut config = Config::default();
        config.limits.max_comment_length = 4;
        let engine = ForumEngine::from_config(Arc::new(MemoryStorage::new()), &config).unwrap();
        let post = engine.create_post(draft("P")).unwrap();

        assert!(engine
            .add_comment(post.id, CommentDraft::new("a", "A", "ok"))
            .is_ok());
        assert!(engine
            .add_comment(post.id, CommentDraft::new("a", "A", "too long"))
            .unwrap_err()
            .is_validation());
    }
}
