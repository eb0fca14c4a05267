//! Object storage operations: public and signed asset URLs.

use crate::client::Connection;
use crate::error::{ClientError, Result};
use crate::types::{SignRequest, SignResponse};
use async_trait::async_trait;
use podcast_core::{AssetRef, AssetStore};
use reqwest::Method;
use std::time::Duration;
use tracing::debug;

/// Storage client for the hosted service.
#[derive(Clone)]
pub struct StorageClient {
    conn: Connection,
}

impl StorageClient {
    pub(crate) fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// URL of an object in a public bucket.
    ///
    /// Pure URL construction; no request is made.
    pub fn object_url(&self, asset: &AssetRef) -> Result<String> {
        let url = self.conn.endpoint(
            ["storage", "v1", "object", "public", asset.bucket.as_str()]
                .into_iter()
                .chain(path_segments(asset)),
        )?;
        Ok(url.into())
    }

    /// Ask the service for a time-limited URL to a private object.
    pub async fn sign(&self, asset: &AssetRef, expires_in: Duration) -> Result<String> {
        let url = self.conn.endpoint(
            ["storage", "v1", "object", "sign", asset.bucket.as_str()]
                .into_iter()
                .chain(path_segments(asset)),
        )?;
        let expires_in = expires_in.as_secs().max(1);
        debug!(url = %url, expires_in, "Signing asset URL");

        let request = self
            .conn
            .request(Method::POST, url)
            .json(&SignRequest { expires_in });

        let response = match self.conn.send(request).await {
            Ok(response) => response,
            Err(ClientError::ServerError { status, message })
                if status == 404 || message.to_ascii_lowercase().contains("not found") =>
            {
                return Err(ClientError::not_found("Asset", asset.to_string()));
            }
            Err(e) => return Err(e),
        };

        let signed: SignResponse = response.json().await.map_err(|e| {
            ClientError::ParseError(format!("Failed to parse signing response: {}", e))
        })?;

        self.absolute(&signed.signed_url)
    }

    /// Signed URLs come back relative to the storage API root.
    fn absolute(&self, signed_url: &str) -> Result<String> {
        if signed_url.starts_with("http://") || signed_url.starts_with("https://") {
            return Ok(signed_url.to_string());
        }

        let root = self.conn.endpoint(["storage", "v1"])?;
        Ok(format!(
            "{}/{}",
            root.as_str().trim_end_matches('/'),
            signed_url.trim_start_matches('/')
        ))
    }
}

fn path_segments(asset: &AssetRef) -> impl Iterator<Item = &str> {
    asset.path.split('/').filter(|segment| !segment.is_empty())
}

#[async_trait]
impl AssetStore for StorageClient {
    fn public_url(&self, asset: &AssetRef) -> podcast_core::Result<String> {
        Ok(self.object_url(asset)?)
    }

    async fn signed_url(
        &self,
        asset: &AssetRef,
        expires_in: Duration,
    ) -> podcast_core::Result<String> {
        Ok(self.sign(asset, expires_in).await?)
    }
}
