use std::fmt;
use std::path::Path;

use arrow::array::ArrayRef;

use super::grid::load_grid;
use super::loader::load_table;
use super::model::{GridArray, Table};
use super::partition::{NodeId, PartitionTree};
use crate::config::LoadOptions;
use crate::error::{CloudyError, Result};

/// A Cloudy grid run: the parameter grid, the output table and its
/// partitioned view.
///
/// Built once from a grid file and a data file; never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    grid: GridArray,
    table: Table,
    labels: Vec<String>,
    keys: Vec<String>,
    partitions: PartitionTree,
}

impl Dataset {
    /// Load a grid/data pair with default [`LoadOptions`].
    ///
    /// `keys`, when given, names the swept parameters; each grid row is then
    /// appended to the table as a column of that name.
    pub fn load(
        grid_path: impl AsRef<Path>,
        data_path: impl AsRef<Path>,
        keys: Option<&[&str]>,
    ) -> Result<Self> {
        Self::load_with_options(grid_path, data_path, keys, &LoadOptions::default())
    }

    pub fn load_with_options(
        grid_path: impl AsRef<Path>,
        data_path: impl AsRef<Path>,
        keys: Option<&[&str]>,
        options: &LoadOptions,
    ) -> Result<Self> {
        let grid_path = grid_path.as_ref();
        let data_path = data_path.as_ref();

        let grid = load_grid(grid_path, options)?;
        let table = load_table(data_path, options)?;
        let dataset = Self::from_parts(grid, table, keys)?;

        log::info!(
            "Loaded {} rows from {} over a {}x{} grid from {} ({} partition leaves)",
            dataset.num_rows(),
            data_path.display(),
            dataset.grid.num_params(),
            dataset.grid.num_points(),
            grid_path.display(),
            dataset.partitions.leaf_ids().len()
        );
        Ok(dataset)
    }

    /// Assemble a dataset from an already loaded grid and table.
    pub fn from_parts(grid: GridArray, table: Table, keys: Option<&[&str]>) -> Result<Self> {
        let mut table = table;
        let mut key_names = Vec::new();

        if let Some(keys) = keys {
            if keys.len() != grid.num_params() {
                return Err(CloudyError::Alignment(format!(
                    "{} key names given for {} swept parameters",
                    keys.len(),
                    grid.num_params()
                )));
            }
            for (param, name) in keys.iter().enumerate() {
                let values = grid.row(param).map(<[f64]>::to_vec).unwrap_or_default();
                table = table.with_column(name, values)?;
                key_names.push(name.to_string());
            }
        }

        let mut labels: Vec<String> = table
            .column_names()
            .into_iter()
            .skip(1)
            .map(String::from)
            .collect();
        labels.sort();

        let partitions = PartitionTree::build(&table, &grid)?;

        Ok(Self {
            grid,
            table,
            labels,
            keys: key_names,
            partitions,
        })
    }

    pub fn grid(&self) -> &GridArray {
        &self.grid
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Sorted column names, excluding the first (index/depth) column.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Swept parameter names, empty unless given at load time.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn partitions(&self) -> &PartitionTree {
        &self.partitions
    }

    pub fn num_rows(&self) -> usize {
        self.table.num_rows()
    }

    /// A column of the full table, in row order.
    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.table.column(name)
    }

    /// Display name of swept parameter `param`.
    pub fn param_name(&self, param: usize) -> String {
        self.keys
            .get(param)
            .cloned()
            .unwrap_or_else(|| format!("p{param}"))
    }

    /// Values of the innermost swept parameter, which varies inside every
    /// partition leaf.
    pub fn inner_param(&self) -> Option<&[f64]> {
        self.grid
            .num_params()
            .checked_sub(1)
            .and_then(|last| self.grid.row(last))
    }

    /// Human label for a partition node, e.g. `hden=3.5, p1=100`.
    pub fn node_label(&self, id: NodeId) -> String {
        let path = self.partitions.key_path(id);
        if path.is_empty() {
            return "all".to_string();
        }
        path.iter()
            .enumerate()
            .map(|(param, key)| format!("{}={key}", self.param_name(param)))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.labels)
    }
}
