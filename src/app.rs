use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RustyCloudyApp {
    pub state: AppState,
}

impl RustyCloudyApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RustyCloudyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: labels and partitions ----
        egui::SidePanel::left("partition_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot or rows ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Plot => plot::grid_plot(ui, &self.state),
            View::Table => table::leaf_table(ui, &self.state),
        });
    }
}
