//! chattrix-core - Core library for chattrix
//!
//! This crate provides the forum's business logic: posts with their like
//! sets and two-level comment trees, the counters kept beside them, and the
//! engine that serializes every change and writes it through to storage.

pub mod error;
pub mod types;
pub mod config;
pub mod validator;
pub mod category;
pub mod comment;
pub mod post;
pub mod engine;
pub mod seed;

pub use error::{ForumError, Result};
pub use types::*;
