use eframe::egui::Ui;
use egui_plot::{Line, Plot, PlotPoints};
use rusty_cloudy::{Dataset, NodeId};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Grid plot (central panel)
// ---------------------------------------------------------------------------

/// Plot the chosen label against the innermost swept parameter, one line
/// per visible partition leaf.
pub fn grid_plot(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a grid and a data file  (File → Open grid… / Open data…)");
            });
            return;
        }
    };
    let Some(label) = state.y_label.as_deref() else {
        return;
    };

    let x_name = dataset.param_name(dataset.grid().num_params().saturating_sub(1));

    Plot::new("grid_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label(x_name)
        .y_axis_label(label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for &id in &state.visible_leaves {
                let Some(points) = leaf_series(dataset, id, label, state.minmax_scaling) else {
                    continue;
                };
                let color = state
                    .color_map
                    .as_ref()
                    .map(|cm| cm.color_for(id))
                    .unwrap_or(eframe::egui::Color32::LIGHT_BLUE);

                let line = Line::new(PlotPoints::from(points))
                    .name(dataset.node_label(id))
                    .color(color)
                    .width(1.5);

                plot_ui.line(line);
            }
        });
}

/// `[x, y]` pairs of one leaf: x from the innermost swept parameter, y from
/// `label`. `None` for a non-numeric label or an unknown leaf.
pub fn leaf_series(dataset: &Dataset, id: NodeId, label: &str, minmax: bool) -> Option<Vec<[f64; 2]>> {
    let node = dataset.partitions().node(id)?;
    let table = node.table()?;
    let x_all = dataset.inner_param()?;
    let y = table.f64_values(label).ok()?;
    let y = if minmax { minmax_scale(&y) } else { y };

    Some(
        node.rows
            .iter()
            .zip(y)
            .map(|(&row, yi)| [x_all[row], yi])
            .collect(),
    )
}

/// Scale to `[0, 1]`; a flat series becomes all zeros.
pub fn minmax_scale(values: &[f64]) -> Vec<f64> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range.abs() < f64::EPSILON {
        vec![0.0; values.len()]
    } else {
        values.iter().map(|&v| (v - min) / range).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusty_cloudy::{GridArray, Table};
    use std::sync::Arc;

    #[test]
    fn minmax_scales_to_unit_range() {
        assert_eq!(minmax_scale(&[2.0, 4.0, 3.0]), vec![0.0, 1.0, 0.5]);
        assert_eq!(minmax_scale(&[5.0, 5.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn leaf_series_pairs_inner_param_with_label() {
        let grid = GridArray::from_rows(vec![
            vec![1.0, 1.0, 2.0, 2.0],
            vec![10.0, 20.0, 10.0, 20.0],
        ])
        .unwrap();
        let table = Table::from_columns(
            vec!["depth".into(), "line".into()],
            vec![
                Arc::new(arrow::array::Float64Array::from(vec![0.0; 4])) as arrow::array::ArrayRef,
                Arc::new(arrow::array::Float64Array::from(vec![-1.0, -2.0, -3.0, -4.0])),
            ],
        )
        .unwrap();
        let ds = Dataset::from_parts(grid, table, None).unwrap();
        let second = ds.partitions().leaf_ids()[1];

        let series = leaf_series(&ds, second, "line", false).unwrap();
        assert_eq!(series, vec![[10.0, -3.0], [20.0, -4.0]]);
        assert!(leaf_series(&ds, second, "missing", false).is_none());
    }
}
