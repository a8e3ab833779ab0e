//! Forum engine module
//!
//! The engine owns the post collection and is the only way to change it.
//! Every mutation is applied in memory and written through a [`PostStorage`]
//! before the caller sees a result.
//!
//! # Example
//!
//! ```ignore
//! use chattrix_core::engine::{ForumEngine, MemoryStorage};
//! use chattrix_core::comment::CommentDraft;
//! use chattrix_core::post::PostDraft;
//! use chattrix_core::{CategoryId, UserId};
//!
//! let engine = ForumEngine::open(MemoryStorage::new())?;
//! let post = engine.create_post(PostDraft::new(CategoryId(1), "u1", "Ann", "Hi", "Body"))?;
//!
//! engine.like(post.id, &UserId::new("u2"))?;
//! let top = engine.add_comment(post.id, CommentDraft::new("u2", "Bo", "Welcome"))?;
//! engine.add_comment(post.id, CommentDraft::new("u1", "Ann", "Thanks").reply_to(top.id))?;
//! ```

pub mod activity;
mod manager;
pub mod migration;
pub mod persistence;

pub use activity::UserActivity;
pub use manager::ForumEngine;
pub use migration::{ForumFile, ForumMigrator, CURRENT_SCHEMA_VERSION};
pub use persistence::memory::MemoryStorage;
pub use persistence::PostStorage;
