//! Project workspace resolution
//!
//! Works out where the configuration and the post collection live, then
//! opens the engine over them.

use anyhow::{Context, Result};
use chattrix_core::config::Config;
use chattrix_core::engine::ForumEngine;
use chattrix_storage::JsonFileStorage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Name of the per-project directory
pub const PROJECT_DIR: &str = ".chattrix";

/// Name of the configuration file inside the project directory
pub const CONFIG_FILE: &str = "config.toml";

/// Location of a chattrix project
#[derive(Debug, Clone)]
pub struct Workspace {
    config_path: PathBuf,
}

/// An opened forum together with the configuration it was opened with
pub struct Forum {
    pub engine: ForumEngine,
    pub config: Config,
}

impl Workspace {
    /// Use an explicit config file, or `.chattrix/config.toml` in the current directory
    pub fn resolve(config: Option<PathBuf>) -> Self {
        let config_path = config.unwrap_or_else(|| Path::new(PROJECT_DIR).join(CONFIG_FILE));
        Self { config_path }
    }

    /// Workspace rooted in a project directory
    pub fn for_project(dir: &Path) -> Self {
        Self {
            config_path: dir.join(PROJECT_DIR).join(CONFIG_FILE),
        }
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Directory holding the configuration file
    pub fn project_dir(&self) -> &Path {
        self.config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }

    /// Check if `chattrix init` has been run for this workspace
    pub fn is_initialized(&self) -> bool {
        self.config_path.exists()
    }

    /// Load the configuration, defaults when there is no file
    pub fn load_config(&self) -> Result<Config> {
        Config::load_or_default(&self.config_path)
            .with_context(|| format!("Failed to load {}", self.config_path.display()))
    }

    /// Directory the post collection is stored in
    ///
    /// A relative `storage.data_dir` is taken relative to the project
    /// directory. Without one, an initialized project keeps its data in
    /// `.chattrix/data` and anything else uses the platform data directory.
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        match config.storage.data_dir {
            Some(ref dir) if dir.is_absolute() => dir.clone(),
            Some(ref dir) => self.project_dir().join(dir),
            None if self.is_initialized() => self.project_dir().join("data"),
            None => JsonFileStorage::default_data_dir(),
        }
    }

    /// Load the configuration and open the engine over the JSON store
    pub fn open(&self) -> Result<Forum> {
        let config = self.load_config()?;
        let data_dir = self.data_dir(&config);
        info!("Using data directory {:?}", data_dir);

        let storage = JsonFileStorage::new(&data_dir, config.storage.file_name.clone())
            .with_context(|| format!("Failed to open storage in {}", data_dir.display()))?;
        let engine = ForumEngine::from_config(Arc::new(storage), &config)
            .context("Failed to load posts")?;

        Ok(Forum { engine, config })
    }
}
