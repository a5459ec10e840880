//! Chunk planning: turning a parsed range and a file size into the exact
//! byte span to send.
//!
//! Ranged requests are capped at [`ChunkPlanner::max_chunk_bytes`], which is
//! derived from an assumed bitrate times a fixed chunk duration. Requests
//! without a `Range` header get the whole file in one response with no cap.
//! Players that seek always send `Range`, so the cap bounds every seekable
//! transfer while plain downloads still receive the complete file.

use crate::config::StreamingConfig;
use crate::error::{Error, Result};
use crate::range::RangeRequest;

/// The byte span chosen for a single response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    start: u64,
    end: u64,
    length: u64,
    partial: bool,
    total_size: u64,
}

impl ChunkPlan {
    /// First byte to send.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Last byte to send (inclusive). Meaningless when `length() == 0`.
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes in the body; always `end - start + 1` for non-empty plans.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// `true` for a 206 response, `false` for a 200.
    pub fn is_partial(&self) -> bool {
        self.partial
    }

    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Value of the `Content-Range` header for a partial plan.
    pub fn content_range(&self) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, self.total_size)
    }
}

/// Computes [`ChunkPlan`]s under a fixed maximum chunk size.
#[derive(Debug, Clone, Copy)]
pub struct ChunkPlanner {
    max_chunk_bytes: u64,
    bitrate_bytes_per_sec: u64,
}

impl ChunkPlanner {
    /// Build a planner from an assumed bitrate (bytes per second) and the
    /// playback duration one chunk should cover.
    pub fn new(bitrate_bytes_per_sec: u64, chunk_duration_secs: u64) -> Self {
        let bitrate_bytes_per_sec = bitrate_bytes_per_sec.max(1);
        Self {
            max_chunk_bytes: bitrate_bytes_per_sec
                .saturating_mul(chunk_duration_secs)
                .max(1),
            bitrate_bytes_per_sec,
        }
    }

    /// Take the chunk size and bitrate exactly as the config reports them.
    pub fn from_config(config: &StreamingConfig) -> Self {
        Self {
            max_chunk_bytes: config.max_chunk_bytes(),
            bitrate_bytes_per_sec: config.bitrate_bytes_per_sec(),
        }
    }

    pub fn max_chunk_bytes(&self) -> u64 {
        self.max_chunk_bytes
    }

    pub fn bitrate_bytes_per_sec(&self) -> u64 {
        self.bitrate_bytes_per_sec
    }

    /// Plan the response for an asset of `size` bytes.
    pub fn plan(&self, range: Option<&RangeRequest>, size: u64) -> Result<ChunkPlan> {
        let Some(range) = range else {
            return Ok(ChunkPlan {
                start: 0,
                end: size.saturating_sub(1),
                length: size,
                partial: false,
                total_size: size,
            });
        };

        if range.start >= size {
            return Err(Error::RangeNotSatisfiable {
                start: range.start,
                size,
            });
        }

        let last = size - 1;
        let capped = range
            .start
            .saturating_add(self.max_chunk_bytes - 1);
        let end = range.end.unwrap_or(last).min(capped).min(last);

        Ok(ChunkPlan {
            start: range.start,
            end,
            length: end - range.start + 1,
            partial: true,
            total_size: size,
        })
    }

    /// Playback seconds covered by `plan` at the assumed bitrate, rounded
    /// to two decimals. Used for logging only.
    pub fn estimated_duration_secs(&self, plan: &ChunkPlan) -> f64 {
        let secs = plan.length as f64 / self.bitrate_bytes_per_sec as f64;
        (secs * 100.0).round() / 100.0
    }
}

impl Default for ChunkPlanner {
    fn default() -> Self {
        Self::from_config(&StreamingConfig::default())
    }
}
