#![warn(clippy::all, rust_2018_idioms)]

use offerthumb::{AppConfig, OfferThumbApp};

fn main() -> eframe::Result {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = AppConfig::from_env();
    log::info!(
        "Starting with model {} (exports go to {})",
        config.model,
        config.export_dir.display()
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("OfferThumb AI")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    eframe::run_native(
        "OfferThumb AI",
        native_options,
        Box::new(|cc| Ok(Box::new(OfferThumbApp::new(cc, config)?))),
    )
}
