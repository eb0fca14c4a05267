/// Storage object references
use crate::error::PodcastError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Reference to an object in the asset store
///
/// Catalog rows store assets as `"bucket/path/to/object"`; the asset store
/// turns a reference into a fetchable (public or signed) URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRef {
    /// Storage bucket name
    pub bucket: String,

    /// Object path inside the bucket (no leading slash)
    pub path: String,
}

impl AssetRef {
    /// Create a reference from bucket and path
    pub fn new(bucket: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            path: path.into().trim_start_matches('/').to_string(),
        }
    }

    /// File extension of the object, lowercased
    pub fn extension(&self) -> Option<String> {
        let name = self.path.rsplit('/').next()?;
        let (_, ext) = name.rsplit_once('.')?;
        (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
    }
}

impl fmt::Display for AssetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.path)
    }
}

impl FromStr for AssetRef {
    type Err = PodcastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('/');
        match trimmed.split_once('/') {
            Some((bucket, path)) if !bucket.is_empty() && !path.is_empty() => {
                Ok(Self::new(bucket, path))
            }
            _ => Err(PodcastError::invalid_input(format!(
                "asset reference must look like 'bucket/path', got '{}'",
                s
            ))),
        }
    }
}

impl Serialize for AssetRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AssetRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
