//! Episode resolution: catalog record to playable URLs.

use crate::types::ResolvedEpisode;
use podcast_core::{AssetRef, AssetStore, ContentRepository, EpisodeId, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How asset URLs are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetAccess {
    /// Buckets are public; URLs are built locally
    Public,
    /// Buckets are private; every URL is signed by the service
    Signed {
        /// Lifetime of each signed URL
        expires_in: Duration,
    },
}

/// Turns an episode id into everything a player needs
pub struct EpisodeResolver<R: ?Sized, S: ?Sized> {
    repository: Arc<R>,
    assets: Arc<S>,
    access: AssetAccess,
}

impl<R, S> EpisodeResolver<R, S>
where
    R: ContentRepository + ?Sized,
    S: AssetStore + ?Sized,
{
    pub fn new(repository: Arc<R>, assets: Arc<S>, access: AssetAccess) -> Self {
        Self {
            repository,
            assets,
            access,
        }
    }

    /// Fetchable URL for one asset
    pub async fn asset_url(&self, asset: &AssetRef) -> Result<String> {
        match self.access {
            AssetAccess::Public => self.assets.public_url(asset),
            AssetAccess::Signed { expires_in } => self.assets.signed_url(asset, expires_in).await,
        }
    }

    /// Resolve an episode
    ///
    /// Fails only if the episode or its audio URL cannot be had. A missing
    /// series or cover leaves the display fields empty.
    pub async fn resolve(&self, id: &EpisodeId) -> Result<ResolvedEpisode> {
        let episode = self.repository.get_episode(id).await?;

        let series = match self.repository.get_series(&episode.series_id).await {
            Ok(series) => Some(series),
            Err(e) => {
                warn!(episode_id = %id, series_id = %episode.series_id, error = %e, "Series lookup failed");
                None
            }
        };

        let audio_url = self.asset_url(&episode.audio).await?;

        let cover_url = match episode.display_cover(series.as_ref()) {
            Some(cover) => match self.asset_url(cover).await {
                Ok(url) => Some(url),
                Err(e) => {
                    warn!(episode_id = %id, cover = %cover, error = %e, "Cover URL unavailable");
                    None
                }
            },
            None => None,
        };

        debug!(episode_id = %id, audio_url = %audio_url, "Resolved episode");

        Ok(ResolvedEpisode {
            series_title: series.map(|s| s.title),
            audio_url,
            cover_url,
            episode,
        })
    }
}
