use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, StringArray};

use super::header::{parse_header_line, read_header};
use super::model::Table;
use crate::config::LoadOptions;
use crate::error::{CloudyError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a Cloudy save file (`.grd`, `.ems`, `.lin`, ...) into a [`Table`].
///
/// Layout:
/// ```text
///  #depth<TAB>H  1  6563A<TAB>...     header, leading '#' stripped
///  <metadata row>                     skipped (`metadata_rows`)
///  1.0e+17<TAB>-18.9131<TAB>...       data
///  ###### GRID_DELIMIT -- grid0001    comment, ignored
/// ```
pub fn load_table(path: &Path, options: &LoadOptions) -> Result<Table> {
    let names = read_header(path, options)?;
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::InvalidData => CloudyError::parse(path, 0, "file is not valid UTF-8"),
        _ => CloudyError::file_access(path, e),
    })?;
    build_table(path, names, &text, options)
}

/// Parse the text of a save file. `path` is only used in error messages.
pub fn parse_table(path: &Path, text: &str, options: &LoadOptions) -> Result<Table> {
    let first_line = text.lines().next().unwrap_or("");
    let names = parse_header_line(first_line, options)
        .ok_or_else(|| CloudyError::parse(path, 1, "empty header line"))?;
    build_table(path, names, text, options)
}

fn build_table(path: &Path, names: Vec<String>, text: &str, options: &LoadOptions) -> Result<Table> {
    if let Some(dup) = first_duplicate(&names) {
        return Err(CloudyError::parse(
            path,
            1,
            format!("duplicate column name '{dup}'"),
        ));
    }

    let (skipped, body) = split_preamble(text, 1 + options.metadata_rows);
    let raw = read_fields(path, body, skipped, names.len(), options)?;

    let columns: Vec<ArrayRef> = raw.into_iter().map(infer_column).collect();
    let table = Table::from_columns(names, columns)?;

    log::debug!(
        "Parsed {} rows x {} columns from {}",
        table.num_rows(),
        table.num_columns(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Line handling
// ---------------------------------------------------------------------------

/// Split off the first `lines` lines. Returns how many were actually
/// skipped and the remaining text.
fn split_preamble(text: &str, lines: usize) -> (usize, &str) {
    let mut offset = 0;
    let mut count = 0;
    for line in text.split_inclusive('\n').take(lines) {
        offset += line.len();
        count += 1;
    }
    (count, &text[offset..])
}

/// Read delimited records into column-major string vectors.
fn read_fields(
    path: &Path,
    body: &str,
    skipped: usize,
    n_columns: usize,
    options: &LoadOptions,
) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter_byte()?)
        .comment(Some(options.comment_byte()?))
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(body.as_bytes());

    let mut columns: Vec<Vec<String>> = vec![Vec::new(); n_columns];

    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e
                .position()
                .map(|p| p.line() as usize + skipped)
                .unwrap_or(0);
            CloudyError::parse(path, line, e.to_string())
        })?;
        let line = record
            .position()
            .map(|p| p.line() as usize + skipped)
            .unwrap_or(0);

        let mut fields: Vec<&str> = record.iter().collect();
        // Cloudy terminates some rows with a delimiter.
        if fields.len() == n_columns + 1 && fields.last().is_some_and(|f| f.trim().is_empty()) {
            fields.pop();
        }
        if fields.len() != n_columns {
            return Err(CloudyError::parse(
                path,
                line,
                format!("expected {n_columns} fields, found {}", fields.len()),
            ));
        }

        for (column, field) in columns.iter_mut().zip(fields) {
            column.push(field.to_string());
        }
    }

    Ok(columns)
}

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

/// `Float64` if every non-empty value parses as a number (empty cells become
/// nulls), `Utf8` otherwise.
fn infer_column(values: Vec<String>) -> ArrayRef {
    let numbers: Option<Vec<Option<f64>>> = values.iter().map(|v| parse_cell(v)).collect();
    match numbers {
        Some(numbers) => Arc::new(Float64Array::from(numbers)),
        None => Arc::new(StringArray::from(values)),
    }
}

/// `Some(None)` for an empty cell, `None` for a non-numeric one.
fn parse_cell(value: &str) -> Option<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Some(None);
    }
    value.parse::<f64>().ok().map(Some)
}

fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = std::collections::BTreeSet::new();
    names
        .iter()
        .find(|name| !seen.insert(name.as_str()))
        .map(String::as_str)
}
