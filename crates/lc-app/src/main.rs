//! Main application entry point

use anyhow::Result;
use clap::Parser;
use eframe::egui;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod notices;

use app::LectureChannelApp;

fn init_logging(args: &cli::Args) {
    // -v wins over RUST_LOG, which wins over the default
    let filter = match args.verbosity_filter() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    let args = cli::Args::parse();
    init_logging(&args);

    let config = args.resolve_config()?;
    info!(manifest = %config.manifest.display(), "Starting lecture channel viewer");

    let runtime = tokio::runtime::Runtime::new()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Lecture Channel",
        options,
        Box::new(move |cc| {
            Box::new(LectureChannelApp::new(cc, runtime, config))
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
