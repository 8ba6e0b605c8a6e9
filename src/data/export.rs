use std::fs::File;
use std::path::{Path, PathBuf};

use parquet::arrow::ArrowWriter;

use super::dataset::Dataset;
use super::model::Table;
use crate::error::{CloudyError, Result};

/// Write a table to a Parquet file.
pub fn write_parquet(table: &Table, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| CloudyError::file_access(path, e))?;
    let mut writer = ArrowWriter::try_new(file, table.batch().schema(), None)?;
    writer.write(table.batch())?;
    writer.close()?;
    Ok(())
}

/// Write every partition leaf of `dataset` to `dir`, one Parquet file per
/// leaf, named after the leaf's key path (`partition_hden=3.5.parquet`).
/// Returns the written paths in traversal order.
pub fn export_partitions(dataset: &Dataset, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| CloudyError::file_access(dir, e))?;

    let mut written = Vec::new();
    for (id, table) in dataset.partitions().leaves() {
        let path = dir.join(format!("partition_{}.parquet", file_stem(&dataset.node_label(id))));
        write_parquet(table, &path)?;
        written.push(path);
    }

    log::info!("Exported {} partition(s) to {}", written.len(), dir.display());
    Ok(written)
}

/// Make a node label safe for a file name.
fn file_stem(label: &str) -> String {
    label
        .chars()
        .filter_map(|c| match c {
            ',' => None,
            c if c.is_whitespace() => Some('_'),
            '/' | '\\' | ':' => Some('-'),
            c => Some(c),
        })
        .collect()
}

impl Dataset {
    /// See [`export_partitions`].
    pub fn export_partitions(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        export_partitions(self, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stems_are_path_safe() {
        assert_eq!(file_stem("hden=3.5, T=100"), "hden=3.5_T=100");
        assert_eq!(file_stem("a/b"), "a-b");
        assert_eq!(file_stem("all"), "all");
    }
}
