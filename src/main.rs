mod app;
mod config;
mod data;
mod state;
mod ui;

use app::CsvFilterApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    log::debug!("Starting with {config:?}");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([720.0, 420.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "CSV Row Filter – Category & Page Range",
        options,
        Box::new(|cc| Ok(Box::new(CsvFilterApp::new(cc, config)))),
    )
}
