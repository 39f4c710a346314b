mod app;
mod color;
mod config;
mod data;
mod pipeline;
mod state;
mod ui;

use std::path::Path;

use anyhow::{Result, anyhow};
use app::FluxContourApp;
use config::{CONFIG_FILE, PlotConfig};
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = PlotConfig::load_or_default(Path::new(CONFIG_FILE))?;
    // Inputs are read before the window opens; a missing file aborts here.
    let (fields, image) = pipeline::run(&config).inspect_err(|e| log::error!("{e:#}"))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(config.window_size)
            .with_min_inner_size([600.0, 300.0]),
        ..Default::default()
    };

    let title = format!("Flux Contour – {}", config.image_name());
    let state = AppState::new(config, fields);

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(FluxContourApp::new(&cc.egui_ctx, state, &image)))),
    )
    .map_err(|e| anyhow!("window closed with an error: {e}"))
}
