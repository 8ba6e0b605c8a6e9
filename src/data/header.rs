use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use crate::config::LoadOptions;
use crate::error::{CloudyError, Result};

/// Read the column names from the first line of a Cloudy save file.
///
/// Only the first line is read; the rest of the file is not checked.
pub fn read_header(path: &Path, options: &LoadOptions) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| CloudyError::file_access(path, e))?;
    let mut line = String::new();
    BufReader::new(file)
        .read_line(&mut line)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidData => CloudyError::parse(path, 1, "header is not valid UTF-8"),
            _ => CloudyError::file_access(path, e),
        })?;

    parse_header_line(&line, options).ok_or_else(|| CloudyError::parse(path, 1, "empty header line"))
}

/// Split a header line into column names.
///
/// Strips the line terminator, one leading comment character (Cloudy writes
/// `#depth\t...`) and one trailing delimiter. Returns `None` for a blank
/// line.
pub fn parse_header_line(line: &str, options: &LoadOptions) -> Option<Vec<String>> {
    let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
    let line = line.strip_prefix(options.comment).unwrap_or(line);
    let line = line.strip_suffix(options.delimiter).unwrap_or(line);
    if line.trim().is_empty() {
        return None;
    }
    Some(line.split(options.delimiter).map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn strips_comment_and_terminator() {
        let names =
            parse_header_line("#depth\tH  1  6563A\tN  2  6584A\r\n", &LoadOptions::default()).unwrap();
        assert_eq!(names, vec!["depth", "H  1  6563A", "N  2  6584A"]);
    }

    #[test]
    fn keeps_inner_spacing_and_drops_trailing_tab() {
        let names = parse_header_line("Index\tgrid parameter string\t\n", &LoadOptions::default()).unwrap();
        assert_eq!(names, vec!["Index", "grid parameter string"]);
    }

    #[test]
    fn blank_header_is_none() {
        assert!(parse_header_line("#\n", &LoadOptions::default()).is_none());
    }

    #[test]
    fn reads_only_the_first_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "#a\tb\n1\t2\t3\n").unwrap();

        let names = read_header(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn missing_file_is_file_access() {
        let err = read_header(Path::new("/nonexistent/sample.grd"), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, CloudyError::FileAccess { .. }));
    }

    #[test]
    fn empty_file_is_parse_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = read_header(file.path(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, CloudyError::Parse { line: 1, .. }));
    }
}
