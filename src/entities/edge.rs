use crate::commit_list::GraphLog;
use crate::entities::lane::GraphLane;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    /// Child and first parent share a column.
    Straight,
    /// First parent sits in another column, the line bends in at the parent's row.
    Fork,
    /// Non-first parent, the line leaves the child sideways.
    Merge,
}

/// Line from a child to one of its parents, in row/column coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub child_row: usize,
    pub child_column: usize,
    /// Column the line runs down.
    pub column: usize,
    /// `None` when the parent lies below the last row.
    pub parent_row: Option<usize>,
    pub parent_column: Option<usize>,
    pub lane: GraphLane,
    pub kind: EdgeKind,
}

#[derive(Debug, Default)]
pub struct EdgeManager {
    edges: Vec<Edge>,
}

impl EdgeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn take_edges(&mut self) -> Vec<Edge> {
        std::mem::take(&mut self.edges)
    }

    pub fn from_log(log: &GraphLog) -> Vec<Edge> {
        let mut edge_manager = Self::new();

        for (child_row, node) in log.nodes().iter().enumerate() {
            let Some(child_lane) = node.lane() else {
                continue;
            };
            let mut parents = Vec::with_capacity(node.parent_count());
            for parent in node.parents() {
                if !parents.contains(parent) {
                    parents.push(*parent);
                }
            }

            for (index, (parent, lane)) in parents.iter().zip(node.parent_lanes()).enumerate() {
                let parent_row = log.row_of(parent);
                let parent_column = parent_row
                    .and_then(|row| log.node(row))
                    .and_then(|parent| parent.lane())
                    .map(|lane| lane.position());

                let kind = if index > 0 {
                    EdgeKind::Merge
                } else if parent_column.is_some_and(|column| column != child_lane.position()) {
                    EdgeKind::Fork
                } else {
                    EdgeKind::Straight
                };

                edge_manager.add(Edge {
                    child_row,
                    child_column: child_lane.position(),
                    column: lane.position(),
                    parent_row,
                    parent_column,
                    lane: *lane,
                    kind,
                });
            }
        }

        edge_manager.take_edges()
    }
}
