//! Flat on-disk storage for uploaded files.

use std::io;
use std::path::{Path, PathBuf};

/// Writes uploads into a single directory under the client's filename.
///
/// Filenames are used verbatim: no sanitization, no collision handling, the
/// last write wins. Names containing `/` land in subdirectories, which are
/// created on demand.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist.
    pub async fn ensure_dir(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `data` to `<dir>/<file_name>`, replacing any existing file.
    pub async fn save(&self, file_name: &str, data: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.join(file_name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, data).await?;

        tracing::info!("Stored upload {} ({} bytes)", path.display(), data.len());
        Ok(path)
    }
}
