// Hide console window on Windows in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! Lightmark - Main Entry Point
//!
//! A lightweight Markdown editor with a debounced live HTML preview.

mod app;
mod config;
mod editor;
mod error;
mod export;
mod files;
mod markdown;
mod preview;
mod state;
mod string_utils;
mod theme;
mod ui;

use app::LightmarkApp;
use config::load_config;
use log::info;

/// Application name constant.
const APP_NAME: &str = "Lightmark";

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting {}", APP_NAME);

    let settings = load_config();
    let window_size = settings.window_size;

    info!(
        "Window configuration: {}x{}, maximized: {}",
        window_size.width, window_size.height, window_size.maximized
    );

    let viewport = eframe::egui::ViewportBuilder::default()
        .with_title(APP_NAME)
        .with_inner_size([window_size.width, window_size.height])
        .with_min_inner_size([480.0, 320.0])
        .with_maximized(window_size.maximized);

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(LightmarkApp::new(cc, settings)))),
    )
}
