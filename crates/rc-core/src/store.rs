//! Media storage abstraction.
//!
//! [`MediaStore`] is the seam between the streaming core and wherever the
//! bytes live. [`FsMediaStore`] serves files from a single directory.

use async_trait::async_trait;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt};

use crate::asset::VideoAsset;
use crate::error::{Error, Result};
use crate::ids::VideoId;

/// Readable handle over a byte span of an asset. Dropping it releases the
/// underlying file.
pub type MediaReader = Pin<Box<dyn AsyncRead + Send>>;

/// Storage backend for video bytes.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Check that `id` exists and return its resolved location and size.
    async fn stat(&self, id: &VideoId) -> Result<VideoAsset>;

    /// Open `asset` positioned at `start`, yielding at most `length` bytes.
    async fn open_range(&self, asset: &VideoAsset, start: u64, length: u64)
        -> Result<MediaReader>;

    /// Names of every video available in the store, sorted.
    async fn list(&self) -> Result<Vec<String>>;
}

/// Filesystem-backed store rooted at a media directory.
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: PathBuf,
    content_type: String,
    extension: String,
}

impl FsMediaStore {
    pub fn new(
        root: impl Into<PathBuf>,
        content_type: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            content_type: content_type.into(),
            extension: extension.into(),
        }
    }

    /// `VideoId` is a single path segment, so the join stays inside `root`.
    fn path_for(&self, id: &VideoId) -> PathBuf {
        self.root.join(id.as_str())
    }

    fn has_listed_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn stat(&self, id: &VideoId) -> Result<VideoAsset> {
        let path = self.path_for(id);

        let metadata = tokio::fs::metadata(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::not_found("video", id),
            _ => Error::from(e),
        })?;

        if !metadata.is_file() {
            return Err(Error::not_found("video", id));
        }

        Ok(VideoAsset::new(
            id.clone(),
            path,
            metadata.len(),
            self.content_type.clone(),
        ))
    }

    async fn open_range(
        &self,
        asset: &VideoAsset,
        start: u64,
        length: u64,
    ) -> Result<MediaReader> {
        let mut file = tokio::fs::File::open(asset.path())
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::not_found("video", asset.id()),
                _ => Error::from(e),
            })?;

        if start > 0 {
            file.seek(SeekFrom::Start(start)).await?;
        }

        // Take limits reads to exactly the planned span.
        Ok(Box::pin(file.take(length)))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut dir = tokio::fs::read_dir(&self.root).await?;
        let mut names = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if !self.has_listed_extension(&path) {
                continue;
            }
            if !entry.file_type().await.map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_owned());
            }
        }

        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn store(root: &Path) -> FsMediaStore {
        FsMediaStore::new(root, "video/mp4", "mp4")
    }

    #[tokio::test]
    async fn stat_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("clip.mp4"), vec![7u8; 321]).unwrap();

        let asset = store(dir.path())
            .stat(&VideoId::parse("clip.mp4").unwrap())
            .await
            .unwrap();
        assert_eq!(asset.size(), 321);
        assert_eq!(asset.content_type(), "video/mp4");
        assert_eq!(asset.path(), dir.path().join("clip.mp4"));
    }

    #[tokio::test]
    async fn stat_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = store(dir.path())
            .stat(&VideoId::parse("missing.mp4").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn stat_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("folder.mp4")).unwrap();
        let err = store(dir.path())
            .stat(&VideoId::parse("folder.mp4").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn open_range_reads_exact_span() {
        let dir = tempfile::tempdir().unwrap();
        let data: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        std::fs::write(dir.path().join("clip.mp4"), &data).unwrap();

        let store = store(dir.path());
        let asset = store.stat(&VideoId::parse("clip.mp4").unwrap()).await.unwrap();
        let mut reader = store.open_range(&asset, 1000, 300).await.unwrap();

        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();
        assert_eq!(out, &data[1000..1300]);
    }

    #[tokio::test]
    async fn open_range_after_delete_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.mp4");
        std::fs::write(&path, b"abc").unwrap();

        let store = store(dir.path());
        let asset = store.stat(&VideoId::parse("gone.mp4").unwrap()).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let err = store.open_range(&asset, 0, 3).await.err().unwrap();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_filters_by_extension_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.mp4", "a.mp4", "notes.txt", "c.MP4"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("dir.mp4")).unwrap();

        let names = store(dir.path()).list().await.unwrap();
        assert_eq!(names, vec!["a.mp4".to_string(), "b.mp4".to_string()]);
    }

    #[tokio::test]
    async fn list_missing_root_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(store(&missing).list().await.is_err());
    }
}
