//! Posts
//!
//! A post is the root of a discussion: its like set, its two-level comment
//! tree and the counters kept beside them.

pub mod attachment;
pub mod draft;
pub mod filter;
pub mod model;

pub use attachment::Attachment;
pub use draft::{PostDraft, PostUpdate};
pub use filter::{PostFilter, SortOrder};
pub use model::{Post, PostInfo};
