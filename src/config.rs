use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CloudyError, Result};

/// Name of the grid file column holding the swept parameter values.
pub const GRID_PARAMETER_COLUMN: &str = "grid parameter string";

/// How Cloudy save files are read.
///
/// Every field has a default matching Cloudy's `save grid` / `save lines`
/// layout, so a partial JSON file only needs the fields it overrides:
///
/// ```json
/// { "metadata_rows": 0 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Field separator.
    pub delimiter: char,
    /// Lines starting with this character are ignored; a single leading
    /// occurrence is also stripped from the header line.
    pub comment: char,
    /// Lines skipped after the header (units / metadata rows).
    pub metadata_rows: usize,
    /// Grid file column holding the parameter values.
    pub grid_column: String,
    /// Separator between components of a multi-parameter grid value.
    pub component_separator: char,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            comment: '#',
            metadata_rows: 1,
            grid_column: GRID_PARAMETER_COLUMN.to_string(),
            component_separator: ',',
        }
    }
}

impl LoadOptions {
    /// Read options from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| CloudyError::file_access(path, e))?;
        let options: LoadOptions = serde_json::from_str(&text)?;
        log::debug!("Loaded options from {}: {options:?}", path.display());
        Ok(options)
    }

    /// The delimiter as a single byte, as the csv reader needs it.
    pub(crate) fn delimiter_byte(&self) -> Result<u8> {
        ascii_byte(self.delimiter, "delimiter")
    }

    pub(crate) fn comment_byte(&self) -> Result<u8> {
        ascii_byte(self.comment, "comment")
    }
}

fn ascii_byte(c: char, what: &str) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(CloudyError::InvalidOption(format!(
            "{what} character {c:?} must be ASCII"
        )))
    }
}
