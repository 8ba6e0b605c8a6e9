use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

/// Show the rows of the selected partition leaf.
pub fn leaf_table(ui: &mut Ui, state: &AppState) {
    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let Some(id) = state.selected_leaf else {
        ui.label("Pick a partition with its 'rows' button.");
        return;
    };
    let Some(table) = dataset.partitions().node(id).and_then(|n| n.table()) else {
        return;
    };

    ui.heading(dataset.node_label(id));
    ui.separator();

    let names = table.column_names();
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), names.len())
        .header(20.0, |mut header| {
            for name in &names {
                header.col(|ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.num_rows(), |mut row| {
                let r = row.index();
                for c in 0..names.len() {
                    row.col(|ui| {
                        ui.label(table.cell_text(c, r));
                    });
                }
            });
        });
}
