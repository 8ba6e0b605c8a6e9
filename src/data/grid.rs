use std::path::Path;

use arrow::array::{Array, Float64Array, StringArray};
use arrow::datatypes::DataType;

use super::loader::load_table;
use super::model::{GridArray, Table};
use crate::config::LoadOptions;
use crate::error::{CloudyError, Result};

/// Load a Cloudy `.grd` file and reshape its parameter column into a
/// [`GridArray`] with one row per swept parameter.
pub fn load_grid(path: &Path, options: &LoadOptions) -> Result<GridArray> {
    let table = load_table(path, options)?;
    let grid = grid_from_table(path, &table, options)?;
    log::debug!(
        "Grid {} sweeps {} parameter(s) over {} points",
        path.display(),
        grid.num_params(),
        grid.num_points()
    );
    Ok(grid)
}

/// Extract the grid parameter column of an already loaded grid table.
///
/// A numeric column is a single swept parameter. A text column holds
/// comma-joined tuples that must all have the same number of components.
pub fn grid_from_table(path: &Path, table: &Table, options: &LoadOptions) -> Result<GridArray> {
    let column = table.column(&options.grid_column)?;

    match column.data_type() {
        DataType::Float64 => {
            let values = column
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| CloudyError::parse(path, 0, "grid column is not Float64"))?;
            if let Some(row) = (0..values.len()).find(|&i| values.is_null(i)) {
                return Err(CloudyError::parse(
                    path,
                    0,
                    format!("grid point {row} has an empty parameter value"),
                ));
            }
            GridArray::from_rows(vec![values.values().to_vec()])
        }
        DataType::Utf8 => {
            let values = column
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| CloudyError::parse(path, 0, "grid column is not Utf8"))?;
            let tuples: Vec<&str> = values.iter().map(|v| v.unwrap_or("")).collect();
            split_components(path, &tuples, options.component_separator)
        }
        other => Err(CloudyError::parse(
            path,
            0,
            format!("grid column has unsupported type {other:?}"),
        )),
    }
}

/// Split `"3.5,100"`-style tuples and transpose them so that row `p` of the
/// result holds component `p` of every tuple.
fn split_components(path: &Path, tuples: &[&str], separator: char) -> Result<GridArray> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (point, tuple) in tuples.iter().enumerate() {
        let components: Vec<&str> = tuple.split(separator).map(str::trim).collect();

        if point == 0 {
            rows = vec![Vec::with_capacity(tuples.len()); components.len()];
        } else if components.len() != rows.len() {
            return Err(CloudyError::Alignment(format!(
                "grid point {point} ('{tuple}') has {} components, grid point 0 has {}",
                components.len(),
                rows.len()
            )));
        }

        for (row, component) in rows.iter_mut().zip(&components) {
            let value = component.parse::<f64>().map_err(|_| {
                CloudyError::parse(
                    path,
                    0,
                    format!("grid point {point}: '{component}' is not a number"),
                )
            })?;
            row.push(value);
        }
    }

    GridArray::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_table;

    fn grid(text: &str) -> Result<GridArray> {
        let path = Path::new("sample.grd");
        let opts = LoadOptions::default();
        let table = parse_table(path, text, &opts)?;
        grid_from_table(path, &table, &opts)
    }

    #[test]
    fn single_parameter_grid_is_one_row() {
        let grid = grid(
            "#Index\tExit code\tgrid parameter string\n\
             #\n\
             0\tok\t8000.000000\n\
             1\tok\t9000.000000\n\
             2\twarn\t10000.000000\n",
        )
        .unwrap();
        assert_eq!(grid.shape(), (1, 3));
        assert_eq!(grid.row(0).unwrap(), &[8000.0, 9000.0, 10000.0]);
    }

    #[test]
    fn comma_tuples_are_transposed() {
        let grid = grid(
            "#Index\tgrid parameter string\n\
             #\n\
             0\t3.500000, 100.000000\n\
             1\t3.500000, 150.000000\n\
             2\t4.000000, 100.000000\n",
        )
        .unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.row(0).unwrap(), &[3.5, 3.5, 4.0]);
        assert_eq!(grid.row(1).unwrap(), &[100.0, 150.0, 100.0]);
    }

    #[test]
    fn inconsistent_arity_is_alignment_error() {
        let err = grid(
            "#Index\tgrid parameter string\n\
             #\n\
             0\t3.5,100\n\
             1\t3.5,150,2\n",
        )
        .unwrap_err();
        assert!(matches!(err, CloudyError::Alignment(_)));
    }

    #[test]
    fn non_numeric_component_is_parse_error() {
        let err = grid(
            "#Index\tgrid parameter string\n\
             #\n\
             0\t3.5,abc\n",
        )
        .unwrap_err();
        assert!(matches!(err, CloudyError::Parse { .. }));
    }

    #[test]
    fn missing_grid_column() {
        let err = grid("#Index\tother\n#\n0\t1\n").unwrap_err();
        assert!(matches!(err, CloudyError::MissingColumn { .. }));
    }

    #[test]
    fn empty_numeric_cell_is_parse_error() {
        let err = grid("#Index\tgrid parameter string\n#\n0\t8000\n1\t\n").unwrap_err();
        assert!(matches!(err, CloudyError::Parse { .. }));
    }
}
