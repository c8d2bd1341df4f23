//! Filesystem-backed content loader

use std::path::{Component, Path, PathBuf};
use async_trait::async_trait;
use lc_core::ContentLoader;
use tracing::debug;

use crate::ContentError;

/// Loads lecture text from files under a content root
pub struct FileContentLoader {
    root: PathBuf,
}

impl FileContentLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a content location onto a file path
    ///
    /// Relative locations resolve against the root and may not climb out of
    /// it; absolute paths are taken as-is. URLs are rejected.
    pub fn resolve(&self, location: &str) -> Result<PathBuf, ContentError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(ContentError::EmptyLocation);
        }
        if let Some((scheme, _)) = location.split_once("://") {
            return Err(ContentError::UnsupportedScheme(scheme.to_string()));
        }

        let path = Path::new(location);
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(ContentError::OutsideRoot(location.to_string()));
        }
        Ok(self.root.join(path))
    }

    /// Read the text behind a content location
    pub async fn read(&self, location: &str) -> Result<String, ContentError> {
        let path = self.resolve(location)?;
        debug!(path = %path.display(), "Reading lecture content");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ContentError::Io { path, source })
    }
}

#[async_trait]
impl ContentLoader for FileContentLoader {
    async fn load(&self, location: &str) -> anyhow::Result<String> {
        Ok(self.read(location).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve() {
        let loader = FileContentLoader::new("/srv/channel");

        assert_eq!(
            loader.resolve("topics/intro.md").unwrap(),
            PathBuf::from("/srv/channel/topics/intro.md")
        );
        assert!(matches!(loader.resolve("  "), Err(ContentError::EmptyLocation)));
        assert!(matches!(
            loader.resolve("https://example.com/a.md"),
            Err(ContentError::UnsupportedScheme(scheme)) if scheme == "https"
        ));
        assert!(matches!(
            loader.resolve("../secrets.txt"),
            Err(ContentError::OutsideRoot(_))
        ));
    }

    #[tokio::test]
    async fn test_load_reads_relative_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("topics")).unwrap();
        std::fs::write(dir.path().join("topics/intro.md"), "# Intro\nHello").unwrap();

        let loader = FileContentLoader::new(dir.path());
        let text = loader.load("topics/intro.md").await.unwrap();
        assert_eq!(text, "# Intro\nHello");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let loader = FileContentLoader::new(dir.path());

        assert!(matches!(loader.read("nope.md").await, Err(ContentError::Io { .. })));
    }
}
