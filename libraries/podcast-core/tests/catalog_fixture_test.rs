//! Exercises the collaborator traits against an in-memory catalog.

use async_trait::async_trait;
use podcast_core::{
    AssetRef, AssetStore, ContentRepository, Episode, EpisodeId, PodcastError, Result, Series,
    SeriesId,
};
use std::collections::HashMap;
use std::time::Duration;

struct MemoryCatalog {
    series: Vec<Series>,
    episodes: Vec<Episode>,
}

#[async_trait]
impl ContentRepository for MemoryCatalog {
    async fn list_series(&self) -> Result<Vec<Series>> {
        Ok(self.series.clone())
    }

    async fn get_series(&self, id: &SeriesId) -> Result<Series> {
        self.series
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| PodcastError::not_found("Series", id.as_str()))
    }

    async fn list_episodes(&self, series_id: &SeriesId) -> Result<Vec<Episode>> {
        Ok(self
            .episodes
            .iter()
            .filter(|e| &e.series_id == series_id)
            .cloned()
            .collect())
    }

    async fn get_episode(&self, id: &EpisodeId) -> Result<Episode> {
        self.episodes
            .iter()
            .find(|e| &e.id == id)
            .cloned()
            .ok_or_else(|| PodcastError::not_found("Episode", id.as_str()))
    }

    async fn search_episodes(&self, query: &str, limit: usize) -> Result<Vec<Episode>> {
        let needle = query.to_lowercase();
        Ok(self
            .episodes
            .iter()
            .filter(|e| e.title.to_lowercase().contains(&needle))
            .take(limit)
            .cloned()
            .collect())
    }
}

struct StaticAssets {
    base: String,
    tokens: HashMap<String, String>,
}

#[async_trait]
impl AssetStore for StaticAssets {
    fn public_url(&self, asset: &AssetRef) -> Result<String> {
        Ok(format!("{}/{}", self.base, asset))
    }

    async fn signed_url(&self, asset: &AssetRef, expires_in: Duration) -> Result<String> {
        let token = self
            .tokens
            .get(&asset.to_string())
            .ok_or_else(|| PodcastError::storage(format!("no such object: {}", asset)))?;
        Ok(format!(
            "{}/{}?token={}&expires={}",
            self.base,
            asset,
            token,
            expires_in.as_secs()
        ))
    }
}

fn catalog() -> MemoryCatalog {
    let show = Series::new("Systems Hour");
    let other = Series::new("Other Show");
    let episodes = vec![
        Episode::new(show.id.clone(), "Async Rust", AssetRef::new("audio", "a.mp3")),
        Episode::new(show.id.clone(), "Ownership", AssetRef::new("audio", "b.mp3")),
        Episode::new(other.id.clone(), "rust gardening", AssetRef::new("audio", "c.mp3")),
    ];
    MemoryCatalog {
        series: vec![show, other],
        episodes,
    }
}

#[tokio::test]
async fn repository_lookups() {
    let catalog = catalog();
    let show = &catalog.series[0];

    let episodes = catalog.list_episodes(&show.id).await.unwrap();
    assert_eq!(episodes.len(), 2);

    let fetched = catalog.get_episode(&episodes[1].id).await.unwrap();
    assert_eq!(fetched.title, "Ownership");

    let missing = catalog.get_series(&SeriesId::new("nope")).await;
    assert!(matches!(missing, Err(e) if e.is_not_found()));
}

#[tokio::test]
async fn repository_search_respects_limit() {
    let catalog = catalog();

    let hits = catalog.search_episodes("RUST", 10).await.unwrap();
    assert_eq!(hits.len(), 2);

    let limited = catalog.search_episodes("rust", 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn asset_store_public_and_signed() {
    let mut tokens = HashMap::new();
    tokens.insert("audio/a.mp3".to_string(), "t0k".to_string());
    let store = StaticAssets {
        base: "https://cdn.example.com".to_string(),
        tokens,
    };

    let asset = AssetRef::new("audio", "a.mp3");
    assert_eq!(
        store.public_url(&asset).unwrap(),
        "https://cdn.example.com/audio/a.mp3"
    );

    let signed = store
        .signed_url(&asset, Duration::from_secs(60))
        .await
        .unwrap();
    assert!(signed.contains("token=t0k"));
    assert!(signed.ends_with("expires=60"));

    let missing = store
        .signed_url(&AssetRef::new("audio", "zzz.mp3"), Duration::from_secs(60))
        .await;
    assert!(matches!(missing, Err(PodcastError::Storage(_))));
}
