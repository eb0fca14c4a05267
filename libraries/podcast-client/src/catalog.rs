//! Catalog operations against the hosted REST interface.

use crate::client::Connection;
use crate::error::{ClientError, Result};
use crate::types::{EpisodeRow, SeriesRow};
use async_trait::async_trait;
use podcast_core::{ContentRepository, Episode, EpisodeId, Series, SeriesId};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Catalog client for the hosted service.
///
/// Implements [`ContentRepository`] over the `series` and `episodes` tables.
#[derive(Clone)]
pub struct CatalogClient {
    conn: Connection,
}

impl CatalogClient {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Fetch rows of `table` matching the given filter parameters.
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = self.conn.endpoint(["rest", "v1", table])?;
        debug!(url = %url, ?params, "Fetching catalog rows");

        let request = self.conn.request(Method::GET, url).query(params);
        let response = self.conn.send(request).await?;

        response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse {} rows: {}", table, e))
        })
    }

    fn series_from(&self, rows: Vec<SeriesRow>) -> Vec<Series> {
        let bucket = &self.conn.config().cover_bucket;
        rows.into_iter().map(|row| row.into_series(bucket)).collect()
    }

    fn episodes_from(&self, rows: Vec<EpisodeRow>) -> Vec<Episode> {
        let config = self.conn.config();
        rows.into_iter()
            .map(|row| row.into_episode(&config.audio_bucket, &config.cover_bucket))
            .collect()
    }
}

/// Strip characters with meaning in a filter expression.
fn search_pattern(query: &str) -> Option<String> {
    let cleaned: String = query
        .trim()
        .chars()
        .filter(|c| !matches!(c, '*' | '%' | ',' | '(' | ')'))
        .collect();
    (!cleaned.trim().is_empty()).then(|| format!("*{}*", cleaned.trim()))
}

#[async_trait]
impl ContentRepository for CatalogClient {
    async fn list_series(&self) -> podcast_core::Result<Vec<Series>> {
        let rows = self
            .fetch_rows(
                "series",
                &[("select", "*".to_string()), ("order", "created_at.desc".to_string())],
            )
            .await?;
        let series = self.series_from(rows);
        debug!(count = series.len(), "Fetched series");
        Ok(series)
    }

    async fn get_series(&self, id: &SeriesId) -> podcast_core::Result<Series> {
        let rows = self
            .fetch_rows(
                "series",
                &[("id", format!("eq.{}", id)), ("select", "*".to_string())],
            )
            .await?;
        self.series_from(rows)
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::not_found("Series", id.as_str()).into())
    }

    async fn list_episodes(&self, series_id: &SeriesId) -> podcast_core::Result<Vec<Episode>> {
        let rows = self
            .fetch_rows(
                "episodes",
                &[
                    ("series_id", format!("eq.{}", series_id)),
                    ("select", "*".to_string()),
                    ("order", "published_at.desc".to_string()),
                ],
            )
            .await?;
        let episodes = self.episodes_from(rows);
        debug!(series_id = %series_id, count = episodes.len(), "Fetched episodes");
        Ok(episodes)
    }

    async fn get_episode(&self, id: &EpisodeId) -> podcast_core::Result<Episode> {
        let rows = self
            .fetch_rows(
                "episodes",
                &[("id", format!("eq.{}", id)), ("select", "*".to_string())],
            )
            .await?;
        self.episodes_from(rows)
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::not_found("Episode", id.as_str()).into())
    }

    async fn search_episodes(
        &self,
        query: &str,
        limit: usize,
    ) -> podcast_core::Result<Vec<Episode>> {
        let Some(pattern) = search_pattern(query) else {
            return Ok(Vec::new());
        };
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows = self
            .fetch_rows(
                "episodes",
                &[
                    ("title", format!("ilike.{}", pattern)),
                    ("select", "*".to_string()),
                    ("order", "published_at.desc".to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(self.episodes_from(rows))
    }
}
