/// Data layer: Cloudy file parsing, grid reshaping and partitioning.
///
/// Architecture:
/// ```text
///   .grd                      .ems / .lin / ...
///     │                              │
///     ▼                              ▼
///   ┌──────────┐  header     ┌──────────┐
///   │   grid   │◄────────────│  loader   │  tab-separated text → Table
///   └──────────┘  + loader   └──────────┘
///     │ GridArray (P × R)            │ Table (Arrow RecordBatch)
///     └───────────────┬──────────────┘
///                     ▼
///              ┌─────────────┐
///              │  partition   │  split rows by parameters 0..P-2
///              └─────────────┘
///                     │
///                     ▼
///              ┌─────────────┐
///              │   dataset    │  labels, key columns, PartitionTree
///              └─────────────┘
///                     │
///                     ▼
///              ┌─────────────┐
///              │   export     │  leaves → Parquet
///              └─────────────┘
/// ```

pub mod dataset;
pub mod export;
pub mod grid;
pub mod header;
pub mod loader;
pub mod model;
pub mod partition;
