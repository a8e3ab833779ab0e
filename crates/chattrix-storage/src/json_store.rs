//! JSON file storage for the post collection

use chattrix_core::engine::{ForumFile, ForumMigrator, PostStorage, CURRENT_SCHEMA_VERSION};
use chattrix_core::error::{ForumError, Result};
use chattrix_core::post::Post;
use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default name of the collection file
pub const DEFAULT_FILE_NAME: &str = "posts.json";

/// Post storage backed by one JSON document
///
/// Every save rewrites the whole document through a temp file and a rename,
/// so a reader never sees a half-written collection.
pub struct JsonFileStorage {
    /// Directory holding the collection file
    data_dir: PathBuf,
    /// Name of the collection file
    file_name: String,
}

impl JsonFileStorage {
    /// Create a new JSON file storage, creating the directory if needed
    pub fn new(data_dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into();
        if file_name.trim().is_empty() {
            return Err(ForumError::Config("Storage file name is empty".to_string()));
        }

        let storage = Self {
            data_dir: data_dir.into(),
            file_name,
        };

        storage.ensure_dirs()?;
        Ok(storage)
    }

    /// Create storage in the platform data directory (~/.chattrix as fallback)
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_data_dir(), DEFAULT_FILE_NAME)
    }

    /// Platform data directory for chattrix
    pub fn default_data_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "chattrix", "chattrix")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".chattrix")
            })
    }

    /// Ensure the data directory exists
    fn ensure_dirs(&self) -> Result<()> {
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir).map_err(|e| {
                ForumError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create data directory: {}", e),
                ))
            })?;
            debug!("Created data directory: {:?}", self.data_dir);
        }
        Ok(())
    }

    /// Path of the collection file
    pub fn file_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    /// Temporary path for atomic writes
    fn temp_path(&self) -> PathBuf {
        self.data_dir.join(format!(".{}.tmp", self.file_name))
    }

    /// Get the data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Write the collection atomically (write to temp, then rename)
    fn atomic_write(&self, posts: &[Post]) -> Result<()> {
        let temp_path = self.temp_path();
        let final_path = self.file_path();

        let file = ForumFile::new(posts.to_vec());

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            ForumError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        writer.flush()?;
        drop(writer);

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            ForumError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Saved {} posts to {:?}", posts.len(), final_path);
        Ok(())
    }

    /// Read and parse the collection file
    fn read_file(&self, path: &Path) -> Result<ForumFile> {
        let file = fs::File::open(path)?;
        let reader = BufReader::new(file);
        let forum_file: ForumFile = serde_json::from_reader(reader)
            .map_err(|e| ForumError::from(e).with_context(format!("Failed to parse {:?}", path)))?;

        if ForumMigrator::needs_migration(&forum_file) {
            info!(
                "Migrating post collection from version {} to {}",
                forum_file.schema_version, CURRENT_SCHEMA_VERSION
            );
            return ForumMigrator::migrate(forum_file);
        }

        Ok(forum_file)
    }
}

impl PostStorage for JsonFileStorage {
    fn load_all(&self) -> Result<Vec<Post>> {
        let path = self.file_path();
        if !path.exists() {
            debug!("No collection file at {:?}, starting empty", path);
            return Ok(Vec::new());
        }

        let posts = self.read_file(&path)?.into_posts();
        info!("Loaded {} posts from {:?}", posts.len(), path);
        Ok(posts)
    }

    fn save_all(&self, posts: &[Post]) -> Result<()> {
        self.atomic_write(posts)
    }
}
