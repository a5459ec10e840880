//! Resolved video assets.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::ids::VideoId;

/// A video that has been verified to exist in storage.
///
/// Built once on a cache miss after a successful stat and never mutated;
/// the cache hands out shared references to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoAsset {
    id: VideoId,
    path: PathBuf,
    size: u64,
    content_type: String,
}

impl VideoAsset {
    pub fn new(
        id: VideoId,
        path: impl Into<PathBuf>,
        size: u64,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            path: path.into(),
            size,
            content_type: content_type.into(),
        }
    }

    pub fn id(&self) -> &VideoId {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Total size in bytes at the time of the stat.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}
