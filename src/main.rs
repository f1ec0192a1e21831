mod demo;

use busy_dialog::{BusyDialogConfig, logging};
use eframe::egui;
use std::path::Path;
use tracing::warn;

const CONFIG_ENV: &str = "BUSY_DIALOG_CONFIG";

fn main() -> eframe::Result<()> {
    if let Err(e) = logging::init() {
        eprintln!("{e}");
    }

    let config = match std::env::var_os(CONFIG_ENV) {
        Some(path) => BusyDialogConfig::load(Path::new(&path)).unwrap_or_else(|e| {
            warn!("{e}; using defaults");
            BusyDialogConfig::default()
        }),
        None => BusyDialogConfig::default(),
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 360.0])
            .with_min_inner_size([420.0, 300.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Busy Dialog Demo",
        native_options,
        Box::new(move |cc| Ok(Box::new(demo::DemoApp::new(cc, config)))),
    )
}
