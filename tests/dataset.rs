use std::path::{Path, PathBuf};

use arrow::array::{Array, Float64Array};
use rusty_cloudy::data::loader::load_table;
use rusty_cloudy::{CloudyError, Dataset, GridKey, LoadOptions};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_double() -> Dataset {
    Dataset::load(
        fixture("double.grd"),
        fixture("double.ems"),
        Some(&["hden", "Temperature"][..]),
    )
    .unwrap()
}

#[test]
fn single_parameter_grid_is_one_leaf() {
    let ds = Dataset::load(fixture("single.grd"), fixture("single.ems"), None).unwrap();

    assert_eq!(ds.grid().shape(), (1, 33));
    let expected: Vec<f64> = (0..33).map(|i| 8000.0 + 1000.0 * i as f64).collect();
    assert_eq!(ds.grid().row(0).unwrap(), expected.as_slice());

    assert_eq!(ds.partitions().depth(), 0);
    let leaves: Vec<_> = ds.partitions().leaves().collect();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].1, ds.table());
    assert_eq!(ds.node_label(leaves[0].0), "all");
}

#[test]
fn labels_are_sorted_and_skip_first_column() {
    let ds = Dataset::load(fixture("single.grd"), fixture("single.ems"), None).unwrap();
    assert_eq!(
        ds.labels(),
        ["H  1  6563A", "N  2  6584A", "O  1  6300A", "S  2  6720A"]
    );
    assert_eq!(
        ds.to_string(),
        r#"["H  1  6563A", "N  2  6584A", "O  1  6300A", "S  2  6720A"]"#
    );
}

#[test]
fn two_parameter_grid_splits_on_the_outer_parameter() {
    let ds = load_double();

    assert_eq!(ds.grid().shape(), (2, 6));
    assert_eq!(ds.grid().row(0).unwrap(), [3.5, 3.5, 3.5, 4.0, 4.0, 4.0]);
    assert_eq!(
        ds.grid().row(1).unwrap(),
        [100.0, 150.0, 200.0, 100.0, 150.0, 200.0]
    );

    let tree = ds.partitions();
    assert_eq!(tree.depth(), 1);
    let groups: Vec<GridKey> = tree
        .root()
        .children()
        .iter()
        .filter_map(|&id| tree.node(id).and_then(|n| n.key))
        .collect();
    assert_eq!(groups, vec![GridKey(3.5), GridKey(4.0)]);

    for (id, leaf) in tree.leaves() {
        let key = tree.key_path(id)[0].value();
        let hden = leaf.f64_values("hden").unwrap();
        assert!(hden.iter().all(|&h| h == key));
        // Row order within a group follows the file.
        assert_eq!(
            leaf.f64_values("Temperature").unwrap(),
            vec![100.0, 150.0, 200.0]
        );
    }
}

#[test]
fn key_columns_join_the_labels() {
    let ds = load_double();
    assert_eq!(ds.keys(), ["hden", "Temperature"]);
    assert_eq!(ds.labels(), ["H2   2.121m", "Temperature", "hden"]);

    let temps = ds.column("Temperature").unwrap();
    let temps = temps.as_any().downcast_ref::<Float64Array>().unwrap();
    assert_eq!(temps.len(), 6);
    assert_eq!(temps.value(4), 150.0);
}

#[test]
fn partitions_preserve_every_row() {
    let ds = load_double();
    let tree = ds.partitions();
    assert_eq!(tree.total_rows(), ds.num_rows());

    let mut source_rows: Vec<Vec<String>> = (0..ds.num_rows())
        .map(|r| ds.table().row_text(r))
        .collect();
    let mut partitioned: Vec<Vec<String>> = tree
        .leaves()
        .flat_map(|(_, t)| (0..t.num_rows()).map(move |r| t.row_text(r)))
        .collect();
    source_rows.sort();
    partitioned.sort();
    assert_eq!(source_rows, partitioned);
}

#[test]
fn loading_twice_gives_equal_datasets() {
    assert_eq!(load_double(), load_double());
}

#[test]
fn node_labels_name_the_swept_parameter() {
    let ds = load_double();
    let labels: Vec<String> = ds
        .partitions()
        .leaf_ids()
        .into_iter()
        .map(|id| ds.node_label(id))
        .collect();
    assert_eq!(labels, ["hden=3.5", "hden=4"]);
}

#[test]
fn grid_file_loads_as_a_plain_table() {
    let table = load_table(&fixture("double.grd"), &LoadOptions::default()).unwrap();
    assert_eq!(
        table.column_names(),
        [
            "Index",
            "Failure?",
            "Warnings?",
            "Exit code",
            "#rank",
            "#seq",
            "grid parameter string"
        ]
    );
    assert_eq!(table.num_rows(), 6);
    assert_eq!(table.cell_text(6, 1), "3.500000, 150.000000");
}

#[test]
fn missing_file_is_a_file_access_error() {
    let err = Dataset::load(fixture("nope.grd"), fixture("single.ems"), None).unwrap_err();
    assert!(matches!(err, CloudyError::FileAccess { .. }));
}

#[test]
fn mismatched_row_counts_are_rejected() {
    let err = Dataset::load(fixture("single.grd"), fixture("double.ems"), None).unwrap_err();
    assert!(matches!(err, CloudyError::Alignment(_)));
}

#[test]
fn wrong_number_of_keys_is_rejected() {
    let err = Dataset::load(
        fixture("double.grd"),
        fixture("double.ems"),
        Some(&["hden"][..]),
    )
    .unwrap_err();
    assert!(matches!(err, CloudyError::Alignment(_)));
}
