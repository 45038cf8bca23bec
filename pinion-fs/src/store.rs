//! Filesystem store implementation.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use pinion_core::{AssetStore, StoreError};

/// Write-through store that persists asset bodies under a directory root.
///
/// Logical paths map directly to files below the root (`nested/app.js`
/// becomes `<root>/nested/app.js`), with parent directories created on
/// demand. A front web server pointed at the same directory can then
/// answer repeat requests without the middleware recompiling anything.
///
/// # Examples
///
/// ```rust,ignore
/// use pinion_fs::FileStore;
///
/// let store = FileStore::new("public/assets");
/// store.write("app.js", b"var x=1;").await?;
/// ```
///
/// # Caveats
///
/// - Entries are **never evicted**. The directory grows until cleaned
///   externally.
/// - Writes are **not atomic**. A reader can observe a partially written
///   file while a write is in flight.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at `root`. Directories are created lazily
    /// on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this store writes under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps a logical path to its on-disk destination.
    ///
    /// Only plain relative paths are accepted. Absolute paths and paths
    /// with `..` or `.` segments would leave the root and are rejected.
    fn destination(&self, logical_path: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(logical_path);
        let plain = !logical_path.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !plain {
            return Err(StoreError::InvalidPath {
                path: logical_path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl AssetStore for FileStore {
    async fn write(&self, logical_path: &str, contents: &[u8]) -> Result<(), StoreError> {
        let destination = self.destination(logical_path)?;
        if let Some(parent) = destination.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| StoreError::Io {
                    path: destination.clone(),
                    source,
                })?;
        }
        match tokio::fs::write(&destination, contents).await {
            Ok(()) => Ok(()),
            Err(source) => Err(StoreError::Io {
                path: destination,
                source,
            }),
        }
    }
}
