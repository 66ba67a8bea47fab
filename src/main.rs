#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

pub mod backend;
pub mod gui;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::backend::catalog::LoadSource;
use crate::backend::settings::Settings;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Feed URL to fetch instead of the configured one
    #[arg(short, long)]
    url: Option<String>,

    /// Local CSV snapshot to load instead of fetching the feed
    #[arg(short, long)]
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let settings = Settings::load();
    let source = match args.file {
        Some(path) => LoadSource::File(path),
        None => LoadSource::Url(args.url.unwrap_or_else(|| settings.feed_url.clone())),
    };
    log::info!("Starting with source: {}", source.describe());

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "web3dir",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(crate::gui::app::GuiApp::new(
                cc,
                source.clone(),
                settings.clone(),
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Eframe error: {}", e))?;

    Ok(())
}
