mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::RustyCloudyApp;
use eframe::egui;
use rusty_cloudy::LoadOptions;
use state::AppState;

/// Environment variable naming an optional JSON [`LoadOptions`] file.
const OPTIONS_ENV: &str = "RUSTY_CLOUDY_OPTIONS";

fn main() -> eframe::Result {
    env_logger::init();

    let mut state = AppState::with_options(load_options());

    // Optional: rusty-cloudy <grid> <data> [keys]
    let mut args = std::env::args().skip(1);
    if let (Some(grid), Some(data)) = (args.next(), args.next()) {
        state.grid_path = Some(PathBuf::from(grid));
        state.data_path = Some(PathBuf::from(data));
        state.key_names = args.next().unwrap_or_default();
        state.reload();
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Cloudy – Grid Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(RustyCloudyApp::new(state)))),
    )
}

fn load_options() -> LoadOptions {
    let Some(path) = std::env::var_os(OPTIONS_ENV) else {
        return LoadOptions::default();
    };
    match LoadOptions::from_json_file(&PathBuf::from(path)) {
        Ok(options) => options,
        Err(e) => {
            log::error!("Ignoring {OPTIONS_ENV}: {e}");
            LoadOptions::default()
        }
    }
}
