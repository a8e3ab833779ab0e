//! chattrix-storage - Storage library for chattrix
//!
//! This crate provides the on-disk post collection used by the CLI.

mod json_store;

pub use json_store::{JsonFileStorage, DEFAULT_FILE_NAME};
