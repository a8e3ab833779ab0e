//! Comment system module
//!
//! Comments form a two-level tree under a post: top-level comments in
//! arrival order, each with its replies in arrival order.

pub mod builder;
pub mod model;

pub use builder::CommentDraft;
pub use model::Comment;
