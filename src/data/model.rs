use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, BooleanArray, Float64Array, StringArray};
use arrow::compute::filter_record_batch;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::error::{CloudyError, Result};

// ---------------------------------------------------------------------------
// GridKey – one swept-parameter value used as a group key
// ---------------------------------------------------------------------------

/// A grid parameter value with a total order, so it can live in a
/// `BTreeSet`. `-0.0` and `0.0` are the same key.
#[derive(Debug, Clone, Copy)]
pub struct GridKey(pub f64);

// -- Manual Eq/Ord so we can put GridKey in BTreeSet --

impl PartialEq for GridKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for GridKey {}

impl PartialOrd for GridKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GridKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        canonical(self.0).total_cmp(&canonical(other.0))
    }
}

impl std::hash::Hash for GridKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        canonical(self.0).to_bits().hash(state);
    }
}

/// Fold `-0.0` into `0.0`.
fn canonical(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

impl fmt::Display for GridKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl GridKey {
    pub fn new(value: f64) -> Self {
        Self(canonical(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

// ---------------------------------------------------------------------------
// GridArray – (P, R) matrix of swept-parameter values
// ---------------------------------------------------------------------------

/// Parameter values of a Cloudy grid, one row per swept parameter and one
/// column per grid point (data row).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridArray {
    rows: Vec<Vec<f64>>,
}

impl GridArray {
    /// Stack per-parameter arrays into a grid. All rows must share a length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            let len = first.len();
            if let Some((p, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != len) {
                return Err(CloudyError::Alignment(format!(
                    "grid parameter {p} has {} values, parameter 0 has {len}",
                    row.len()
                )));
            }
        }
        Ok(Self { rows })
    }

    /// Number of swept parameters (P).
    pub fn num_params(&self) -> usize {
        self.rows.len()
    }

    /// Number of grid points (R).
    pub fn num_points(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.num_params(), self.num_points())
    }

    pub fn row(&self, param: usize) -> Option<&[f64]> {
        self.rows.get(param).map(Vec::as_slice)
    }

    /// Sorted distinct values of one parameter.
    pub fn unique_sorted(&self, param: usize) -> Vec<GridKey> {
        self.row(param)
            .map(|row| {
                row.iter()
                    .map(|&v| GridKey::new(v))
                    .collect::<BTreeSet<_>>()
                    .into_iter()
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Table – named, equal-length columns over an Arrow RecordBatch
// ---------------------------------------------------------------------------

/// A loaded Cloudy save file.
///
/// Columns are either `Float64` (nullable) or `Utf8`. Row order is the file
/// order of the data lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    batch: RecordBatch,
}

impl Table {
    /// Build a table from parallel name/column lists.
    pub fn from_columns(names: Vec<String>, columns: Vec<ArrayRef>) -> Result<Self> {
        if names.len() != columns.len() {
            return Err(CloudyError::Alignment(format!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let mut seen = BTreeSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(CloudyError::Alignment(format!(
                    "duplicate column name '{name}'"
                )));
            }
        }

        let fields: Vec<Field> = names
            .iter()
            .zip(&columns)
            .map(|(name, col)| Field::new(name, col.data_type().clone(), true))
            .collect();
        let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?;
        Ok(Self { batch })
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn num_columns(&self) -> usize {
        self.batch.num_columns()
    }

    /// Column names in file order.
    pub fn column_names(&self) -> Vec<&str> {
        self.batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    pub fn column(&self, name: &str) -> Result<&ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| CloudyError::MissingColumn {
                name: name.to_string(),
            })
    }

    /// A numeric column as `f64` values; nulls become `NaN`.
    pub fn f64_values(&self, name: &str) -> Result<Vec<f64>> {
        let col = self.column(name)?;
        let values = col
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| {
                CloudyError::Alignment(format!(
                    "column '{name}' is {:?}, not numeric",
                    col.data_type()
                ))
            })?;
        Ok(values.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
    }

    /// Keep the rows where `mask` is true, preserving their order.
    pub fn filter(&self, mask: &BooleanArray) -> Result<Self> {
        if mask.len() != self.num_rows() {
            return Err(CloudyError::Alignment(format!(
                "row mask has {} entries for {} rows",
                mask.len(),
                self.num_rows()
            )));
        }
        Ok(Self {
            batch: filter_record_batch(&self.batch, mask)?,
        })
    }

    /// Keep the rows at `indices` (ascending).
    pub fn select_rows(&self, indices: &[usize]) -> Result<Self> {
        let mut mask = vec![false; self.num_rows()];
        for &i in indices {
            if let Some(slot) = mask.get_mut(i) {
                *slot = true;
            }
        }
        self.filter(&BooleanArray::from(mask))
    }

    /// Return a copy with one more `Float64` column appended.
    pub fn with_column(&self, name: &str, values: Vec<f64>) -> Result<Self> {
        if self.batch.column_by_name(name).is_some() {
            return Err(CloudyError::Alignment(format!(
                "column '{name}' already exists"
            )));
        }
        if values.len() != self.num_rows() {
            return Err(CloudyError::Alignment(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.num_rows()
            )));
        }

        let mut names: Vec<String> = self.column_names().into_iter().map(String::from).collect();
        let mut columns: Vec<ArrayRef> = self.batch.columns().to_vec();
        names.push(name.to_string());
        columns.push(Arc::new(Float64Array::from(values)));
        Self::from_columns(names, columns)
    }

    /// Render one cell as text; nulls render as an empty string.
    pub fn cell_text(&self, column: usize, row: usize) -> String {
        let col = self.batch.column(column);
        if col.is_null(row) {
            return String::new();
        }
        match col.data_type() {
            DataType::Float64 => col
                .as_any()
                .downcast_ref::<Float64Array>()
                .map(|a| a.value(row).to_string())
                .unwrap_or_default(),
            DataType::Utf8 => col
                .as_any()
                .downcast_ref::<StringArray>()
                .map(|a| a.value(row).to_string())
                .unwrap_or_default(),
            other => format!("{other:?}"),
        }
    }

    /// One row rendered cell by cell.
    pub fn row_text(&self, row: usize) -> Vec<String> {
        (0..self.num_columns())
            .map(|c| self.cell_text(c, row))
            .collect()
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = pretty_format_batches(std::slice::from_ref(&self.batch)).map_err(|_| fmt::Error)?;
        write!(f, "{rendered}")
    }
}
