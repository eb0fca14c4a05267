//! Catalog domain types

mod asset;
mod episode;
mod ids;
mod series;

pub use asset::AssetRef;
pub use episode::{format_clock, Episode};
pub use ids::{EpisodeId, SeriesId};
pub use series::Series;
