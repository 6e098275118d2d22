mod app;
mod ui;

use app::EqScopeApp;
use eframe::{NativeOptions, egui};

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([600.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "EQ Scope",
        options,
        Box::new(|cc| {
            let app = EqScopeApp::new(cc)?;
            Ok(Box::new(app))
        }),
    )
}
