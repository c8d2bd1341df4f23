use std::path::{Path, PathBuf};
use async_trait::async_trait;
use lc_core::{Listing, ListingProvider};
use tracing::debug;

use super::parse_manifest;
use crate::ManifestError;

/// Listing provider backed by a manifest file on disk
pub struct ManifestSource {
    /// Path to the manifest file
    path: PathBuf,
    /// Display name used in logs and events
    name: String,
}

impl ManifestSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("manifest.json")
            .to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the manifest
    pub async fn read(&self) -> Result<Listing, ManifestError> {
        debug!(path = %self.path.display(), "Reading channel manifest");
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ManifestError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_manifest(&text)
    }
}

#[async_trait]
impl ListingProvider for ManifestSource {
    async fn fetch_listing(&self) -> anyhow::Result<Listing> {
        Ok(self.read().await?)
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
