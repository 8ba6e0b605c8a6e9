use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusty_cloudy::{Dataset, LoadOptions, NodeId};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Plot,
    Table,
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until both files are picked).
    pub dataset: Option<Dataset>,

    pub grid_path: Option<PathBuf>,
    pub data_path: Option<PathBuf>,

    /// How save files are parsed.
    pub options: LoadOptions,

    /// Comma-separated swept parameter names, e.g. `hden, Temperature`.
    pub key_names: String,

    /// Column plotted on the y axis.
    pub y_label: Option<String>,

    /// Partition leaves currently drawn.
    pub visible_leaves: BTreeSet<NodeId>,

    /// Leaf shown in the table view.
    pub selected_leaf: Option<NodeId>,

    /// One colour per leaf.
    pub color_map: Option<ColorMap>,

    pub minmax_scaling: bool,

    pub view: View,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn with_options(options: LoadOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded dataset: show every leaf, plot the first label.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        let leaves = dataset.partitions().leaf_ids();
        self.visible_leaves = leaves.iter().copied().collect();
        self.selected_leaf = leaves.first().copied();
        self.color_map = Some(ColorMap::new(&leaves));

        let keep = self
            .y_label
            .as_ref()
            .is_some_and(|label| dataset.labels().contains(label));
        if !keep {
            self.y_label = dataset.labels().first().cloned();
        }

        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Load (or reload) the dataset once both paths are known.
    pub fn reload(&mut self) {
        let (Some(grid), Some(data)) = (self.grid_path.clone(), self.data_path.clone()) else {
            return;
        };
        let keys = parse_key_names(&self.key_names);
        match load_pair(&grid, &data, &keys, &self.options) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} rows, labels {}",
                    dataset.num_rows(),
                    dataset
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Show or hide one leaf.
    pub fn toggle_leaf(&mut self, id: NodeId) {
        if !self.visible_leaves.remove(&id) {
            self.visible_leaves.insert(id);
        }
    }

    /// Show every leaf below `id`.
    pub fn select_all(&mut self, id: NodeId) {
        let leaves = self.leaves_under(id);
        self.visible_leaves.extend(leaves);
    }

    /// Hide every leaf below `id`.
    pub fn select_none(&mut self, id: NodeId) {
        for leaf in self.leaves_under(id) {
            self.visible_leaves.remove(&leaf);
        }
    }

    fn leaves_under(&self, id: NodeId) -> Vec<NodeId> {
        let Some(ds) = &self.dataset else {
            return Vec::new();
        };
        let tree = ds.partitions();
        let mut stack = vec![id];
        let mut leaves = Vec::new();
        while let Some(current) = stack.pop() {
            let Some(node) = tree.node(current) else {
                continue;
            };
            if node.is_leaf() {
                leaves.push(current);
            } else {
                stack.extend(node.children());
            }
        }
        leaves
    }
}

/// Split `"hden, Temperature"` into names; blank input means no names.
pub fn parse_key_names(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

pub fn load_pair(
    grid: &Path,
    data: &Path,
    keys: &[String],
    options: &LoadOptions,
) -> Result<Dataset> {
    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let keys = (!key_refs.is_empty()).then_some(key_refs.as_slice());
    Dataset::load_with_options(grid, data, keys, options).with_context(|| {
        format!(
            "loading grid '{}' with data '{}'",
            grid.display(),
            data.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Float64Array};
    use rusty_cloudy::{GridArray, Table};
    use std::sync::Arc;

    fn dataset() -> Dataset {
        let grid = GridArray::from_rows(vec![
            vec![1.0, 1.0, 2.0, 2.0],
            vec![10.0, 20.0, 10.0, 20.0],
        ])
        .unwrap();
        let table = Table::from_columns(
            vec!["depth".into(), "line".into()],
            vec![
                Arc::new(Float64Array::from(vec![0.0; 4])) as ArrayRef,
                Arc::new(Float64Array::from(vec![1.0, 2.0, 3.0, 4.0])),
            ],
        )
        .unwrap();
        Dataset::from_parts(grid, table, None).unwrap()
    }

    #[test]
    fn key_names_are_trimmed_and_blank_ignored() {
        assert_eq!(parse_key_names(" hden , Temperature,"), vec!["hden", "Temperature"]);
        assert!(parse_key_names("  ").is_empty());
    }

    #[test]
    fn new_dataset_shows_every_leaf() {
        let mut state = AppState::default();
        state.set_dataset(dataset());

        assert_eq!(state.visible_leaves.len(), 2);
        assert_eq!(state.y_label.as_deref(), Some("line"));
        assert!(state.selected_leaf.is_some());
    }

    #[test]
    fn toggling_and_bulk_selection() {
        let mut state = AppState::default();
        state.set_dataset(dataset());
        let leaves: Vec<NodeId> = state.visible_leaves.iter().copied().collect();

        state.toggle_leaf(leaves[0]);
        assert!(!state.visible_leaves.contains(&leaves[0]));

        state.select_none(0);
        assert!(state.visible_leaves.is_empty());

        state.select_all(0);
        assert_eq!(state.visible_leaves.len(), 2);
    }

    #[test]
    fn reload_without_both_paths_is_a_no_op() {
        let mut state = AppState {
            grid_path: Some(PathBuf::from("only.grd")),
            ..AppState::default()
        };
        state.reload();
        assert!(state.dataset.is_none());
        assert!(state.status_message.is_none());
    }

    #[test]
    fn failed_load_sets_status_message() {
        let mut state = AppState {
            grid_path: Some(PathBuf::from("/nonexistent/a.grd")),
            data_path: Some(PathBuf::from("/nonexistent/a.ems")),
            ..AppState::default()
        };
        state.reload();
        assert!(state.dataset.is_none());
        assert!(state.status_message.unwrap().contains("loading grid"));
    }
}
