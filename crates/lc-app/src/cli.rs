//! Command-line arguments

use std::path::PathBuf;
use clap::{ArgAction, Parser};
use lc_data::{config::ViewerConfig, ConfigError};

/// Browse a lecture channel manifest
#[derive(Debug, Parser)]
#[command(name = "lecture-channel", version, about)]
pub struct Args {
    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Channel manifest to open
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Directory that content locations are relative to
    #[arg(long, value_name = "DIR")]
    pub content_root: Option<PathBuf>,

    /// Channel name to show instead of the manifest's
    #[arg(long, value_name = "TEXT")]
    pub name: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Config file values with command-line overrides applied
    pub fn resolve_config(&self) -> Result<ViewerConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ViewerConfig::from_file(path)?,
            None => ViewerConfig::default(),
        };

        if let Some(manifest) = &self.manifest {
            config.manifest = manifest.clone();
        }
        if let Some(root) = &self.content_root {
            config.content_root = Some(root.clone());
        }
        if let Some(name) = &self.name {
            config.channel_name = Some(name.clone());
        }
        Ok(config)
    }

    /// Log filter requested by `-v`, if any
    pub fn verbosity_filter(&self) -> Option<&'static str> {
        match self.verbose {
            0 => None,
            1 => Some("debug"),
            _ => Some("trace"),
        }
    }
}
