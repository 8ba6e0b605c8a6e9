use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use thiserror::Error;

/// Errors raised while loading, aligning or exporting Cloudy output.
#[derive(Debug, Error)]
pub enum CloudyError {
    /// The input path is missing or unreadable.
    #[error("cannot access '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line or value could not be parsed. `line` is 1-based, 0 when the
    /// failure is not tied to a single line.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("column '{name}' not found")]
    MissingColumn { name: String },

    /// Grid and table disagree in shape.
    #[error("alignment error: {0}")]
    Alignment(String),

    #[error(transparent)]
    Arrow(#[from] ArrowError),

    #[error(transparent)]
    Parquet(#[from] ParquetError),

    #[error("invalid options file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

impl CloudyError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CloudyError::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        CloudyError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_renders_path_and_line() {
        let err = CloudyError::parse("run/sample.ems", 7, "expected 3 fields, found 2");
        assert_eq!(err.to_string(), "run/sample.ems:7: expected 3 fields, found 2");
    }

    #[test]
    fn file_access_keeps_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CloudyError::file_access("missing.grd", io);
        assert!(err.to_string().starts_with("cannot access 'missing.grd'"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
