//! Parse Cloudy grid output into Arrow tables and split them into nested
//! partitions following the order in which the grid swept its parameters.
//!
//! ```no_run
//! use rusty_cloudy::Dataset;
//!
//! let ds = Dataset::load("run/sample.grd", "run/sample.ems", Some(&["hden", "Temperature"][..]))?;
//! println!("{ds}");
//! for (id, leaf) in ds.partitions().leaves() {
//!     println!("{}: {} rows", ds.node_label(id), leaf.num_rows());
//! }
//! # Ok::<(), rusty_cloudy::CloudyError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;

pub use config::LoadOptions;
pub use data::dataset::Dataset;
pub use data::model::{GridArray, GridKey, Table};
pub use data::partition::{NodeId, PartitionTree};
pub use error::{CloudyError, Result};
