mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::AnimeDashboardApp;
use config::AppConfig;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::from_env();
    log::info!("Starting with data file {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Anime Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(AnimeDashboardApp::new(&config)))),
    )
}
