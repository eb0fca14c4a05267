//! Podcast Player Core
//!
//! Platform-agnostic catalog types, collaborator traits, and error handling
//! shared by the playback, client, and application crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Series`, `Episode`, `AssetRef` and their ids
//! - **Collaborator Traits**: `ContentRepository` (catalog reads) and
//!   `AssetStore` (asset reference to fetchable URL)
//! - **Error Handling**: Unified `PodcastError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use podcast_core::types::{AssetRef, Episode, Series};
//!
//! let series = Series::new("Rust in Production");
//! let audio: AssetRef = "audio/rust-in-production/ep1.mp3".parse().unwrap();
//! let episode = Episode::new(series.id.clone(), "Episode 1", audio);
//!
//! assert_eq!(episode.series_id, series.id);
//! assert_eq!(episode.audio.bucket, "audio");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{PodcastError, Result};
pub use traits::{AssetStore, ContentRepository};

pub use types::{format_clock, AssetRef, Episode, EpisodeId, Series, SeriesId};
