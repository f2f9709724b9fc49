//! Filesystem blob store: one file per upload, named `<id>_<basename>`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{BlobStore, BlobStoreError, MessageId};

const FALLBACK_FILENAME: &str = "file";

pub struct FileSystemBlobStore {
    root: PathBuf,
}

impl FileSystemBlobStore {
    /// The directory is created lazily on the first upload
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Storage path of a blob. Only the final component of the client-supplied
    /// filename is used.
    pub fn blob_path(&self, id: &MessageId, filename: &str) -> PathBuf {
        let basename = Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILENAME);
        self.root.join(format!("{}_{}", id, basename))
    }
}

#[async_trait]
impl BlobStore for FileSystemBlobStore {
    async fn put(
        &self,
        id: &MessageId,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<(), BlobStoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.blob_path(id, filename);
        tokio::fs::write(&path, &data).await?;
        tracing::debug!("Stored blob {} ({} bytes)", path.display(), data.len());
        Ok(())
    }
}
