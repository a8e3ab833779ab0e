//! Configuration management for chattrix

use crate::error::{ForumError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage settings
    pub storage: StorageConfig,
    /// Content limits
    pub limits: LimitsConfig,
    /// Listing settings
    pub listing: ListingConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ForumError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No configuration at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject settings the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("limits.max_title_length", self.limits.max_title_length),
            ("limits.max_content_length", self.limits.max_content_length),
            ("limits.max_comment_length", self.limits.max_comment_length),
            ("listing.recent_limit", self.listing.recent_limit),
            ("listing.popular_limit", self.listing.popular_limit),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(ForumError::Config(format!("{} must be greater than zero", name)));
            }
        }
        if self.storage.file_name.trim().is_empty() {
            return Err(ForumError::Config("storage.file_name cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the post collection (default: project data dir)
    pub data_dir: Option<PathBuf>,
    /// File name of the post collection
    pub file_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            file_name: "posts.json".to_string(),
        }
    }
}

/// Content limits, in characters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum post title length
    pub max_title_length: usize,
    /// Maximum post body length
    pub max_content_length: usize,
    /// Maximum comment length
    pub max_comment_length: usize,
    /// Maximum number of tags on a post
    pub max_tags: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_title_length: 200,
            max_content_length: 10000,
            max_comment_length: 2000,
            max_tags: 10,
        }
    }
}

/// Listing-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Default size of the recent posts list
    pub recent_limit: usize,
    /// Default size of the popular posts list
    pub popular_limit: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            recent_limit: 10,
            popular_limit: 10,
        }
    }
}
