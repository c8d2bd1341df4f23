//! Viewer configuration

use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

use crate::ConfigError;

/// Channel name shown when neither the config nor the manifest names one
pub const DEFAULT_CHANNEL_NAME: &str = "Lecture Channel";

/// Configuration for the viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Overrides the channel name from the manifest
    pub channel_name: Option<String>,

    /// Path to the channel manifest
    pub manifest: PathBuf,

    /// Base directory for relative content locations
    pub content_root: Option<PathBuf>,

    /// Initial window size
    pub window: WindowSettings,
}

/// Window settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            channel_name: None,
            manifest: PathBuf::from("assets/channels.json"),
            content_root: None,
            window: WindowSettings::default(),
        }
    }
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from a JSON file; missing fields take defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Directory content locations resolve against
    pub fn content_root(&self) -> PathBuf {
        self.content_root.clone().unwrap_or_else(|| {
            self.manifest
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default()
        })
    }

    /// Name to show for the channel
    pub fn display_name(&self, listing_name: Option<&str>) -> String {
        self.channel_name
            .as_deref()
            .or(listing_name)
            .unwrap_or(DEFAULT_CHANNEL_NAME)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_content_root_defaults_to_manifest_dir() {
        let config = ViewerConfig {
            manifest: PathBuf::from("/srv/channel/channels.json"),
            ..Default::default()
        };
        assert_eq!(config.content_root(), PathBuf::from("/srv/channel"));

        let config = ViewerConfig {
            content_root: Some(PathBuf::from("/data")),
            ..config
        };
        assert_eq!(config.content_root(), PathBuf::from("/data"));
    }

    #[test]
    fn test_display_name_precedence() {
        let mut config = ViewerConfig::default();
        assert_eq!(config.display_name(None), DEFAULT_CHANNEL_NAME);
        assert_eq!(config.display_name(Some("From manifest")), "From manifest");

        config.channel_name = Some("Configured".to_string());
        assert_eq!(config.display_name(Some("From manifest")), "Configured");
    }

    #[test]
    fn test_from_file_fills_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), r#"{ "manifest": "lectures/index.json", "window": { "width": 900 } }"#).unwrap();

        let config = ViewerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.manifest, PathBuf::from("lectures/index.json"));
        assert_eq!(config.window.width, 900.0);
        assert_eq!(config.window.height, 800.0);
        assert!(config.channel_name.is_none());
    }

    #[test]
    fn test_from_file_errors() {
        assert!(matches!(
            ViewerConfig::from_file(Path::new("/definitely/not/here.json")),
            Err(ConfigError::Io { .. })
        ));

        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[1, 2").unwrap();
        assert!(matches!(ViewerConfig::from_file(file.path()), Err(ConfigError::Parse(_))));
    }
}
