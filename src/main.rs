use std::path::PathBuf;

use eframe::egui;
use incident_explorer::app::IncidentExplorerApp;
use incident_explorer::config::ExplorerConfig;
use incident_explorer::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let (config, config_error) = match ExplorerConfig::from_env() {
        Ok(config) => (config, None),
        Err(e) => {
            log::error!("Ignoring configuration: {e:#}");
            (ExplorerConfig::default(), Some(format!("Config error: {e:#}")))
        }
    };

    let mut state = AppState::new(config);
    if let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) {
        state.load_path(&path);
    }
    if state.status_message.is_none() {
        state.status_message = config_error;
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Incident Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(IncidentExplorerApp::new(state)))),
    )
}
