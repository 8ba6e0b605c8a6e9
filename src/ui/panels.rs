use std::collections::BTreeSet;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use rusty_cloudy::{Dataset, NodeId};

use crate::color::ColorMap;
use crate::state::{AppState, View};

// ---------------------------------------------------------------------------
// Left side panel – label selector and partition tree
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Grid");
    ui.separator();

    ui.label(format!("Grid: {}", file_name(state.grid_path.as_deref())));
    ui.label(format!("Data: {}", file_name(state.data_path.as_deref())));
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Keys");
        ui.text_edit_singleline(&mut state.key_names)
            .on_hover_text("Comma-separated swept parameter names, outer first");
    });
    if ui.button("Reload").clicked() {
        state.reload();
    }
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut actions = Vec::new();
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Y-axis selector ----
            ui.strong("Plot");
            let current = state.y_label.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("y_label")
                .selected_text(&current)
                .show_ui(ui, |ui: &mut Ui| {
                    for label in dataset.labels() {
                        if ui.selectable_label(current == *label, label).clicked() {
                            state.y_label = Some(label.clone());
                        }
                    }
                });
            ui.horizontal(|ui: &mut Ui| {
                ui.selectable_value(&mut state.view, View::Plot, "Plot");
                ui.selectable_value(&mut state.view, View::Table, "Table");
            });
            ui.separator();

            // ---- Partition tree ----
            ui.strong("Partitions");
            partition_node(
                ui,
                dataset,
                0,
                &state.visible_leaves,
                state.selected_leaf,
                state.color_map.as_ref(),
                &mut actions,
            );
        });

    // Apply tree clicks once the dataset borrow has ended.
    for action in actions {
        match action {
            TreeAction::Toggle(id) => state.toggle_leaf(id),
            TreeAction::All(id) => state.select_all(id),
            TreeAction::None(id) => state.select_none(id),
            TreeAction::Select(id) => {
                state.selected_leaf = Some(id);
                state.view = View::Table;
            }
        }
    }
}

enum TreeAction {
    Toggle(NodeId),
    All(NodeId),
    None(NodeId),
    Select(NodeId),
}

fn partition_node(
    ui: &mut Ui,
    dataset: &Dataset,
    id: NodeId,
    visible: &BTreeSet<NodeId>,
    selected: Option<NodeId>,
    colors: Option<&ColorMap>,
    actions: &mut Vec<TreeAction>,
) {
    let tree = dataset.partitions();
    let Some(node) = tree.node(id) else {
        return;
    };

    if let Some(table) = node.table() {
        let mut text = RichText::new(format!("{}  ({})", leaf_label(dataset, id), table.num_rows()));
        if let Some(cm) = colors {
            text = text.color(cm.color_for(id));
        }
        ui.horizontal(|ui: &mut Ui| {
            let mut checked = visible.contains(&id);
            if ui.checkbox(&mut checked, text).changed() {
                actions.push(TreeAction::Toggle(id));
            }
            if ui
                .selectable_label(selected == Some(id), "rows")
                .clicked()
            {
                actions.push(TreeAction::Select(id));
            }
        });
        return;
    }

    let header = if id == 0 {
        "all".to_string()
    } else {
        leaf_label(dataset, id)
    };
    egui::CollapsingHeader::new(RichText::new(header).strong())
        .id_salt(("partition", id))
        .default_open(id == 0)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    actions.push(TreeAction::All(id));
                }
                if ui.small_button("None").clicked() {
                    actions.push(TreeAction::None(id));
                }
            });
            for &child in node.children() {
                partition_node(ui, dataset, child, visible, selected, colors, actions);
            }
        });
}

/// Only the innermost key of a node; its parents are visible in the tree.
fn leaf_label(dataset: &Dataset, id: NodeId) -> String {
    let path = dataset.partitions().key_path(id);
    match path.last() {
        Some(key) => format!("{}={key}", dataset.param_name(path.len() - 1)),
        None => "all".to_string(),
    }
}

fn file_name(path: Option<&std::path::Path>) -> String {
    path.and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "–".to_string())
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open grid…").clicked() {
                open_grid_dialog(state);
                ui.close_menu();
            }
            if ui.button("Open data…").clicked() {
                open_data_dialog(state);
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Export partitions…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            let (params, points) = ds.grid().shape();
            ui.label(format!(
                "{} rows, {params} swept parameter(s), {points} grid points, {} of {} partitions visible",
                ds.num_rows(),
                state.visible_leaves.len(),
                ds.partitions().leaf_ids().len()
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.minmax_scaling, "Min-Max Scaling")
            .clicked()
        {
            state.minmax_scaling = !state.minmax_scaling;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_grid_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open Cloudy grid file")
        .add_filter("Cloudy grid", &["grd"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.grid_path = Some(path);
        state.reload();
    }
}

pub fn open_data_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open Cloudy save file")
        .add_filter("Cloudy output", &["ems", "lin", "ovr", "txt"])
        .add_filter("All files", &["*"])
        .pick_file();

    if let Some(path) = file {
        state.data_path = Some(path);
        state.reload();
    }
}

pub fn export_dialog(state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let Some(dir) = rfd::FileDialog::new()
        .set_title("Export partitions to Parquet")
        .pick_folder()
    else {
        return;
    };

    match dataset.export_partitions(&dir) {
        Ok(paths) => {
            state.status_message = None;
            log::info!("Wrote {} Parquet file(s) to {}", paths.len(), dir.display());
        }
        Err(e) => {
            log::error!("Export failed: {e}");
            state.status_message = Some(format!("Export failed: {e}"));
        }
    }
}
