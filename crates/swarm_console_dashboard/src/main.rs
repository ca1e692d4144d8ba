mod app;
mod graph_canvas;
mod panels;
mod theme;

use eframe::egui;
use swarm_console::{ConsoleConfig, LiveSync};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::DashboardApp;

fn main() -> eframe::Result<()> {
    init_tracing();

    let config = load_config();
    info!(
        base_url = %config.base_url,
        poll_interval_ms = config.poll_interval_ms,
        offline = config.offline,
        "starting swarm console dashboard"
    );

    let sync = match LiveSync::from_config(&config) {
        Ok(sync) => sync,
        Err(err) => {
            warn!("http client unavailable ({err}); running offline on sample data");
            LiveSync::from_config(&ConsoleConfig {
                offline: true,
                ..config
            })
            .map_err(|err| eframe::Error::AppCreation(Box::new(err)))?
        }
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(egui::vec2(1280.0, 820.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Swarm Console",
        native_options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(sync)))),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config() -> ConsoleConfig {
    match ConsoleConfig::from_default_sources() {
        Ok(config) => config,
        Err(err) => {
            warn!("invalid dashboard config ({err}); using defaults");
            ConsoleConfig::default()
        }
    }
}
