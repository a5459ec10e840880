//! Typed identifier for videos.
//!
//! A [`VideoId`] is the file name a client asks for in `/video/{name}`. It is
//! opaque to the streaming core but is guaranteed to be a single path segment,
//! so joining it onto the media directory can never escape that directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Longest name accepted; matches the common filesystem limit.
const MAX_NAME_LEN: usize = 255;

/// Identifier of a video asset, validated as a single file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VideoId(String);

impl VideoId {
    /// Validate `name` and wrap it.
    ///
    /// Rejects empty names, `.`/`..`, path separators, and control
    /// characters.
    pub fn parse(name: impl Into<String>) -> Result<Self> {
        let name = name.into();

        if name.is_empty() {
            return Err(Error::Validation("video name is empty".into()));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(Error::Validation(format!(
                "video name exceeds {MAX_NAME_LEN} bytes"
            )));
        }
        if name == "." || name == ".." {
            return Err(Error::Validation(format!("invalid video name: {name}")));
        }
        if name.contains(['/', '\\']) {
            return Err(Error::Validation(format!(
                "video name contains a path separator: {name}"
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(Error::Validation(
                "video name contains control characters".into(),
            ));
        }

        Ok(Self(name))
    }

    /// Borrow the raw name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for VideoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VideoId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<VideoId> for String {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
