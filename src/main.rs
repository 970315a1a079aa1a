// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! MEMEDIT - Meme editor
//!
//! A cross-platform desktop application for captioning images with
//! draggable colored text, drawing and erasing freehand on top, and
//! exporting the flattened result.

mod app;
mod config;
mod error;
mod io;
mod models;
mod render;
mod ui;
mod util;

use anyhow::Result;
use app::MemeApp;
use config::EditorConfig;

fn main() -> Result<()> {
    let (config, config_problem) = EditorConfig::load();

    // Initialize logging; RUST_LOG overrides the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if let Some(e) = config_problem {
        log::warn!("{}; using default settings", e);
    }

    let app = MemeApp::new(config.clone())
        .map_err(|e| anyhow::anyhow!("Failed to start editor: {}", e))?;

    let min_width = config.viewport.width as f32 + 380.0;
    let min_height = config.viewport.height as f32 + 120.0;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([min_width.max(1100.0), min_height.max(640.0)])
            .with_min_inner_size([800.0, 600.0])
            .with_title("MEMEDIT - Meme editor"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "MEMEDIT",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
