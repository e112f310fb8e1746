mod state;
mod ui;

use eframe::egui;
use state::AppState;

struct SalesmapApp {
    state: AppState,
}

impl SalesmapApp {
    fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            state: AppState::new(),
        }
    }
}

impl eframe::App for SalesmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::draw(&mut self.state, ctx);
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Salesmap",
        options,
        Box::new(|cc| Ok(Box::new(SalesmapApp::new(cc)))),
    )
}
