use super::model::{GridArray, GridKey, Table};
use crate::error::{CloudyError, Result};

/// Index of a node in a [`PartitionTree`].
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Child ids in ascending key order.
    Branch(Vec<NodeId>),
    Leaf(Table),
}

/// One group of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionNode {
    pub parent: Option<NodeId>,
    /// Distance from the root. The children of a level-`n` node are split on
    /// grid parameter `n`.
    pub level: usize,
    /// Value of grid parameter `level - 1` shared by every row; `None` at
    /// the root.
    pub key: Option<GridKey>,
    /// Source row indices, ascending.
    pub rows: Vec<usize>,
    pub kind: NodeKind,
}

impl PartitionNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn table(&self) -> Option<&Table> {
        match &self.kind {
            NodeKind::Leaf(table) => Some(table),
            NodeKind::Branch(_) => None,
        }
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Branch(children) => children,
            NodeKind::Leaf(_) => &[],
        }
    }
}

/// A table split into nested groups by the swept parameters of its grid.
///
/// Parameter `n` (for `n` in `0..P-1`) splits level `n`; the last parameter
/// stays as row variation inside each leaf. Nodes live in an arena, created
/// level by level, so leaves appear in traversal order. Node 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
    depth: usize,
}

impl PartitionTree {
    /// Partition `table` by the rows of `grid`.
    ///
    /// At each level every pending node gets one child per distinct value of
    /// that grid parameter, in ascending order, even when the child is empty.
    pub fn build(table: &Table, grid: &GridArray) -> Result<Self> {
        if grid.num_params() > 0 && grid.num_points() != table.num_rows() {
            return Err(CloudyError::Alignment(format!(
                "grid has {} points but the table has {} rows",
                grid.num_points(),
                table.num_rows()
            )));
        }

        let depth = grid.num_params().saturating_sub(1);
        let mut nodes = vec![PartitionNode {
            parent: None,
            level: 0,
            key: None,
            rows: (0..table.num_rows()).collect(),
            kind: NodeKind::Branch(Vec::new()),
        }];

        if depth == 0 {
            nodes[0].kind = NodeKind::Leaf(table.clone());
            return Ok(Self { nodes, depth });
        }

        let mut pending: Vec<NodeId> = vec![0];
        for param in 0..depth {
            let groups = grid.unique_sorted(param);
            let values = grid.row(param).unwrap_or_default();
            let mut next = Vec::with_capacity(pending.len() * groups.len());

            let mut contiguous = true;
            for &id in &pending {
                let rows = nodes[id].rows.clone();
                contiguous &= is_contiguous(rows.iter().map(|&r| GridKey::new(values[r])));

                let mut children = Vec::with_capacity(groups.len());
                for &group in &groups {
                    let child_rows: Vec<usize> = rows
                        .iter()
                        .copied()
                        .filter(|&r| GridKey::new(values[r]) == group)
                        .collect();
                    let child = nodes.len();
                    nodes.push(PartitionNode {
                        parent: Some(id),
                        level: param + 1,
                        key: Some(group),
                        rows: child_rows,
                        kind: NodeKind::Branch(Vec::new()),
                    });
                    children.push(child);
                    next.push(child);
                }
                nodes[id].kind = NodeKind::Branch(children);
            }

            if !contiguous {
                log::warn!(
                    "grid parameter {param} is not swept outer-to-inner; groups interleave in file order"
                );
            }
            pending = next;
        }

        for id in pending {
            let leaf = table.select_rows(&nodes[id].rows)?;
            nodes[id].kind = NodeKind::Leaf(leaf);
        }

        log::debug!(
            "Partitioned {} rows into {} leaves over {depth} level(s)",
            table.num_rows(),
            nodes.iter().filter(|n| n.is_leaf()).count()
        );
        Ok(Self { nodes, depth })
    }

    /// Nesting depth, `max(P - 1, 0)`.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn root(&self) -> &PartitionNode {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> Option<&PartitionNode> {
        self.nodes.get(id)
    }

    /// Leaf ids in traversal order.
    pub fn leaf_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    /// Leaf tables in traversal order.
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &Table)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.table().map(|t| (id, t)))
    }

    /// Group keys from the root down to `id`.
    pub fn key_path(&self, id: NodeId) -> Vec<GridKey> {
        let mut path = Vec::new();
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            if let Some(key) = node.key {
                path.push(key);
            }
            current = node.parent.and_then(|p| self.nodes.get(p));
        }
        path.reverse();
        path
    }

    /// Total rows over all leaves.
    pub fn total_rows(&self) -> usize {
        self.leaves().map(|(_, t)| t.num_rows()).sum()
    }
}

/// Whether every distinct key occurs in a single run.
pub(crate) fn is_contiguous(keys: impl Iterator<Item = GridKey>) -> bool {
    let mut finished = std::collections::BTreeSet::new();
    let mut current: Option<GridKey> = None;
    for key in keys {
        if current == Some(key) {
            continue;
        }
        if finished.contains(&key) {
            return false;
        }
        if let Some(prev) = current {
            finished.insert(prev);
        }
        current = Some(key);
    }
    true
}
