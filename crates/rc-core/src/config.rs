//! Application configuration types.
//!
//! The top-level [`Config`] struct is deserialized from TOML and carries the
//! server, streaming, cache, and history sections. Every section defaults
//! sensibly so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub streaming: StreamingConfig,
    pub cache: CacheConfig,
    pub history: HistoryConfig,
}

impl Config {
    /// Deserialize a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config(format!("config parse error: {e}")))
    }

    /// Load and parse a config file. Unlike [`Config::load_or_default`] this
    /// reports every failure, including a missing file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&contents)
    }

    /// Load configuration from a file path, falling back to defaults if the
    /// path is `None` or the file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse config file {}: {e}", path.display());
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No config file at {}; using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read config file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.server.port == 0 {
            warnings.push("server.port is 0; a random port will be assigned".into());
        }

        if !self.server.media_dir.is_dir() {
            warnings.push(format!(
                "server.media_dir {} is not a directory; every video will be reported missing",
                self.server.media_dir.display()
            ));
        }

        if self.streaming.bitrate_kbps == 0 {
            warnings.push(format!(
                "streaming.bitrate_kbps is 0; assuming 1 byte/s, chunks are {} bytes",
                self.streaming.max_chunk_bytes()
            ));
        }

        if self.streaming.chunk_duration_secs == 0 {
            warnings.push("streaming.chunk_duration_secs is 0; chunks are 1 byte".into());
        }

        if self.streaming.read_buffer_bytes == 0 {
            warnings.push("streaming.read_buffer_bytes is 0; using 8192".into());
        } else if self.streaming.read_buffer_bytes as u64 > self.streaming.max_chunk_bytes() {
            warnings.push(format!(
                "streaming.read_buffer_bytes ({}) exceeds the maximum chunk size ({})",
                self.streaming.read_buffer_bytes,
                self.streaming.max_chunk_bytes()
            ));
        }

        if self.cache.ttl_secs == 0 {
            warnings.push("cache.ttl_secs is 0; every request will stat storage".into());
        }

        if self.cache.sweep_interval_secs == Some(0) {
            warnings.push("cache.sweep_interval_secs is 0; sweeping is disabled".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory the `/video/{name}` route resolves names against.
    pub media_dir: PathBuf,
    /// Static front-end assets served as the router fallback.
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 3000,
            media_dir: PathBuf::from("./videos"),
            static_dir: Some(PathBuf::from("./public")),
        }
    }
}

/// Byte-range streaming settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Assumed media bitrate in kilobits (1000 bits) per second.
    pub bitrate_kbps: u64,
    /// Playback seconds a single ranged response may cover.
    pub chunk_duration_secs: u64,
    /// Size of each read from storage while streaming a body.
    pub read_buffer_bytes: usize,
    /// `Content-Type` sent for every video.
    pub content_type: String,
    /// File extension (without dot) listed by `/videos`.
    pub extension: String,
}

impl StreamingConfig {
    /// Assumed bitrate in bytes per second, never below 1.
    pub fn bitrate_bytes_per_sec(&self) -> u64 {
        (self.bitrate_kbps.saturating_mul(1000) / 8).max(1)
    }

    /// Largest span a ranged response may carry, never below 1.
    pub fn max_chunk_bytes(&self) -> u64 {
        self.bitrate_bytes_per_sec()
            .saturating_mul(self.chunk_duration_secs)
            .max(1)
    }

    /// Read increment actually used, never zero.
    pub fn effective_read_buffer(&self) -> usize {
        if self.read_buffer_bytes == 0 {
            8192
        } else {
            self.read_buffer_bytes
        }
    }
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            bitrate_kbps: 128,
            chunk_duration_secs: 30,
            read_buffer_bytes: 64 * 1024,
            content_type: "video/mp4".into(),
            extension: "mp4".into(),
        }
    }
}

/// Location cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
    /// When set, a background task drops expired entries at this interval.
    /// Expiry is always enforced on read regardless.
    pub sweep_interval_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 3600,
            sweep_interval_secs: None,
        }
    }
}

/// Playback history settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Keep at most this many entries, dropping the oldest. `None` keeps all.
    pub max_entries: Option<usize>,
}
