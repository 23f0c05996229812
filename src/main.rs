//! ThermoVis - Main Entry Point
//!
//! Desktop widget visualizing a rolling synthetic temperature series with
//! threshold-based coloring and status display.

use thermovis_rs::frontend::ThermoVisApp;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> eframe::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,thermovis_rs=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ThermoVis");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 560.0])
            .with_min_inner_size([640.0, 400.0])
            .with_title("ThermoVis"),
        ..Default::default()
    };

    eframe::run_native(
        "ThermoVis",
        native_options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(ThermoVisApp::new(cc)))
        }),
    )
}
