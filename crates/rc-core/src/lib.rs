//! rc-core: the byte-range streaming core shared by the reelcast server.
//!
//! This crate holds everything that decides *what* to send for a request,
//! independent of the HTTP framework: range parsing, chunk planning, the
//! TTL-bounded location cache, the media store abstraction, and the
//! playback history log. It also carries the unified error type and the
//! application configuration.

pub mod asset;
pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod ids;
pub mod plan;
pub mod range;
pub mod resolve;
pub mod store;

// Re-export the most commonly used items at the crate root.
pub use asset::VideoAsset;
pub use cache::LocationCache;
pub use error::{Error, Result};
pub use ids::VideoId;
pub use plan::{ChunkPlan, ChunkPlanner};
pub use range::RangeRequest;
pub use resolve::{AssetResolver, Resolution};
pub use store::{FsMediaStore, MediaReader, MediaStore};
