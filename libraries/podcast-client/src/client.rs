//! Main hosted service client.

use crate::catalog::CatalogClient;
use crate::error::{ClientError, Result};
use crate::storage::StorageClient;
use crate::types::ClientConfig;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Entry point for the hosted catalog and storage service.
///
/// Validates the configuration once and hands out cheap sub-clients that
/// share one connection pool.
///
/// # Example
///
/// ```ignore
/// use podcast_client::{ClientConfig, ServiceClient};
/// use podcast_core::ContentRepository;
///
/// let client = ServiceClient::new(ClientConfig::new("https://svc.example.com", "anon-key"))?;
/// let series = client.catalog().list_series().await?;
/// println!("{} series", series.len());
/// ```
#[derive(Clone)]
pub struct ServiceClient {
    conn: Connection,
}

impl ServiceClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim().trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        let base = Url::parse(&url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;

        if config.api_key.trim().is_empty() {
            return Err(ClientError::Unauthorized("API key cannot be empty".into()));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("PodcastPlayer/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self {
            conn: Connection {
                http,
                base: Arc::new(base),
                config: Arc::new(ClientConfig { url, ..config }),
            },
        })
    }

    /// Get the normalized service URL.
    pub fn url(&self) -> &str {
        &self.conn.config.url
    }

    /// Catalog (series/episodes) client.
    pub fn catalog(&self) -> CatalogClient {
        CatalogClient::new(self.conn.clone())
    }

    /// Object storage client.
    pub fn storage(&self) -> StorageClient {
        StorageClient::new(self.conn.clone())
    }
}

/// Shared HTTP state behind every sub-client.
#[derive(Clone)]
pub(crate) struct Connection {
    http: Client,
    base: Arc<Url>,
    config: Arc<ClientConfig>,
}

impl Connection {
    pub(crate) fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base URL with extra path segments appended (each one percent-encoded).
    pub(crate) fn endpoint<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url> {
        let mut url = (*self.base).clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(format!("{} cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Request with the service's auth headers attached.
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http
            .request(method, url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(self.config.bearer())
    }

    /// Send a request and turn non-success statuses into errors.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(ClientError::from_send)?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "Service responded");

        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await.unwrap_or_default();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            Err(ClientError::Unauthorized(error_text))
        } else {
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}
