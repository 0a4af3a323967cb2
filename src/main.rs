//! Season Compare - League of Legends championship season comparison
//!
//! Upload the CSV exports of two championship seasons, filter players by team
//! and position, and compare descriptive statistics and charts side by side.

mod charts;
mod config;
mod data;
mod gui;
mod pipeline;
mod state;
mod stats;

use config::DashboardConfig;
use eframe::egui;
use gui::SeasonCompareApp;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load_or_default();
    log::info!(
        "Comparing seasons {} and {} (players: {}, teams: {})",
        config.season_a,
        config.season_b,
        config.players_dataset,
        config.teams_dataset
    );

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Season Compare"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Season Compare",
        options,
        Box::new(|cc| Ok(Box::new(SeasonCompareApp::new(cc, config)))),
    )
}
