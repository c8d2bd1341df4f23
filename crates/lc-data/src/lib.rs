//! Listing, content and configuration sources for the lecture channel viewer

pub mod config;
pub mod content;
pub mod manifest;

use std::path::PathBuf;
use thiserror::Error;

// Re-exports
pub use config::{ViewerConfig, WindowSettings, DEFAULT_CHANNEL_NAME};
pub use content::FileContentLoader;
pub use manifest::{parse_manifest, ManifestSource};

/// Errors that can occur while reading a channel manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest parsing error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Manifest item {index} has no title")]
    MissingTitle { index: usize },
}

/// Errors that can occur while loading lecture content
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty content location")]
    EmptyLocation,

    #[error("Unsupported location scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("Location '{0}' escapes the content root")]
    OutsideRoot(String),
}

/// Errors that can occur while reading viewer configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config parsing error: {0}")]
    Parse(#[from] serde_json::Error),
}
