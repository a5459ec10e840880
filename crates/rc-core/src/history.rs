//! In-memory playback history.
//!
//! An append-only log of the video names clients report having played.
//! Nothing is persisted; the log is rebuilt empty on every start.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::VecDeque;

/// A single recorded playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub video: String,
    pub recorded_at: DateTime<Utc>,
}

/// Append-only playback log, optionally capped to the newest entries.
#[derive(Debug, Default)]
pub struct PlaybackHistory {
    entries: RwLock<VecDeque<HistoryEntry>>,
    max_entries: Option<usize>,
}

impl PlaybackHistory {
    pub fn new(max_entries: Option<usize>) -> Self {
        Self {
            entries: RwLock::new(VecDeque::new()),
            max_entries,
        }
    }

    /// Append a playback of `video`.
    pub fn record(&self, video: impl Into<String>) -> HistoryEntry {
        let entry = HistoryEntry {
            video: video.into(),
            recorded_at: Utc::now(),
        };

        let mut entries = self.entries.write();
        entries.push_back(entry.clone());
        if let Some(max) = self.max_entries {
            while entries.len() > max {
                entries.pop_front();
            }
        }

        entry
    }

    /// Video names in the order they were recorded.
    pub fn videos(&self) -> Vec<String> {
        self.entries.read().iter().map(|e| e.video.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
