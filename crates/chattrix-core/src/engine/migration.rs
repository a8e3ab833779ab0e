//! Forum file format and schema migration

use crate::error::{ForumError, Result};
use crate::post::Post;
use crate::types::ProtocolVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Current schema version
pub const CURRENT_SCHEMA_VERSION: &str = "1.0";

/// Persisted post collection with schema version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumFile {
    /// Schema version for migration
    pub schema_version: String,
    /// Posts, most recent first
    pub posts: Vec<Post>,
    /// Extra fields for forward compatibility
    #[serde(flatten, default)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl ForumFile {
    /// Create a new file with the current schema version
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION.to_string(),
            posts,
            extra: HashMap::new(),
        }
    }

    /// Get the posts, consuming the file
    pub fn into_posts(self) -> Vec<Post> {
        self.posts
    }

    /// Parse schema version
    pub fn parse_version(&self) -> Option<ProtocolVersion> {
        let (major, minor) = self.schema_version.split_once('.')?;
        Some(ProtocolVersion {
            major: major.parse().ok()?,
            minor: minor.parse().ok()?,
        })
    }
}

/// Forum file schema migrator
pub struct ForumMigrator;

impl ForumMigrator {
    /// Bring a file up to the current schema version
    pub fn migrate(mut file: ForumFile) -> Result<ForumFile> {
        let version = file.parse_version().ok_or_else(|| {
            ForumError::UnsupportedSchemaVersion(format!(
                "invalid version format '{}'",
                file.schema_version
            ))
        })?;

        let current = ProtocolVersion::V1_0;
        if !version.is_compatible(&current) {
            return Err(ForumError::UnsupportedSchemaVersion(format!(
                "{} (expected {}.x)",
                file.schema_version, current.major
            )));
        }

        // 1.x files share one layout; newer minors only add optional fields
        file.schema_version = CURRENT_SCHEMA_VERSION.to_string();
        Ok(file)
    }

    /// Check if a file needs migration
    pub fn needs_migration(file: &ForumFile) -> bool {
        file.schema_version != CURRENT_SCHEMA_VERSION
    }
}
