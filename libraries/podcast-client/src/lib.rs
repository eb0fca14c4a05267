//! Podcast Player Service Client
//!
//! HTTP client library for the hosted catalog-and-storage service.
//!
//! # Features
//!
//! - **Catalog**: series and episode listings, lookups, title search
//!   ([`CatalogClient`] implements `podcast_core::ContentRepository`)
//! - **Storage**: public and signed asset URLs
//!   ([`StorageClient`] implements `podcast_core::AssetStore`)
//! - **Resolution**: episode id to audio/cover URLs ([`EpisodeResolver`])
//! - **Search**: debounced, last-writer-wins query pipeline ([`SearchPipeline`])
//!
//! # Example
//!
//! ```ignore
//! use podcast_client::{AssetAccess, ClientConfig, EpisodeResolver, ServiceClient};
//! use podcast_core::EpisodeId;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ServiceClient::new(ClientConfig::new("https://svc.example.com", "anon-key"))?;
//!
//!     let resolver = EpisodeResolver::new(
//!         Arc::new(client.catalog()),
//!         Arc::new(client.storage()),
//!         AssetAccess::Signed { expires_in: Duration::from_secs(3600) },
//!     );
//!     let resolved = resolver.resolve(&EpisodeId::new("ep-1")).await?;
//!     println!("{} -> {}", resolved.episode.title, resolved.audio_url);
//!
//!     Ok(())
//! }
//! ```

mod catalog;
mod client;
mod error;
mod resolver;
pub mod search;
mod storage;
mod types;

// Re-export main types
pub use client::ServiceClient;
pub use error::{ClientError, Result};
pub use resolver::{AssetAccess, EpisodeResolver};
pub use search::{SearchPipeline, SearchResults};
pub use types::{ClientConfig, EpisodeRow, ResolvedEpisode, SeriesRow, SignRequest, SignResponse};

// Re-export sub-clients for direct use if needed
pub use catalog::CatalogClient;
pub use storage::StorageClient;
