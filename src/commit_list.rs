use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use git2::Oid;

use crate::entities::commit::CommitInfo;
use crate::entities::edge::{Edge, EdgeManager};
use crate::entities::lane::{GraphLane, LaneManager};
use crate::entities::node::GraphNode;
use crate::error::GraphError;
use crate::history_oid::HistoryOids;
use crate::walk::CommitSource;

/// Builds the laid-out graph one commit at a time from a [`CommitSource`].
///
/// Each pulled commit gets its lane before it is appended, so a node's lane only
/// depends on the rows above it. Rows already appended are never revisited except to
/// link children.
pub struct GraphCommitList<'w> {
    source: Option<Box<dyn CommitSource + 'w>>,
    nodes: Vec<GraphNode>,
    rows: HashMap<Oid, usize>,
    lane_manager: LaneManager,
    history_oids: HistoryOids,
    commit_count: usize,
    max_line: usize,
    cancel: Option<Arc<AtomicBool>>,
    exhausted: bool,
    filled: bool,
}

impl Default for GraphCommitList<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'w> GraphCommitList<'w> {
    pub fn new() -> Self {
        Self {
            source: None,
            nodes: Vec::new(),
            rows: HashMap::new(),
            lane_manager: LaneManager::new(),
            history_oids: HistoryOids::new(),
            commit_count: 0,
            max_line: 0,
            cancel: None,
            exhausted: false,
            filled: false,
        }
    }

    /// Binds the walk to pull from. Nothing is pulled yet.
    pub fn source(&mut self, walk: impl CommitSource + 'w) {
        self.source = Some(Box::new(walk));
        self.exhausted = false;
    }

    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancel = Some(flag);
    }

    /// Puts the working tree placeholder on top, pointing at `head`. Only allowed before the
    /// first [`fill_to`](Self::fill_to), and only once.
    pub fn add_uncommited_changes_graph_commit(&mut self, head: Oid) -> Result<(), GraphError> {
        if self.filled {
            return Err(GraphError::UncommittedAfterFill);
        }
        self.enter(GraphNode::new(CommitInfo::uncommitted(head)))
    }

    /// Pulls until `limit` commits are laid out or the source runs dry.
    ///
    /// `limit` counts commits, not rows: the uncommitted placeholder is left out, so a list
    /// carrying it ends up with up to `limit + 1` rows.
    ///
    /// On error the rows laid out so far stay valid.
    pub fn fill_to(&mut self, limit: usize) -> Result<(), GraphError> {
        let mut source = self.source.take().ok_or(GraphError::NoSource)?;
        self.filled = true;
        let result = self.pull(source.as_mut(), limit);
        self.source = Some(source);
        result
    }

    fn pull(
        &mut self,
        source: &mut (dyn CommitSource + 'w),
        limit: usize,
    ) -> Result<(), GraphError> {
        while !self.exhausted && self.commit_count < limit {
            if self
                .cancel
                .as_ref()
                .is_some_and(|flag| flag.load(Ordering::Relaxed))
            {
                log::debug!("graph cancelled after {} commits", self.commit_count);
                return Err(GraphError::Cancelled);
            }

            match source.next_node()? {
                Some(node) => self.enter(node)?,
                None => {
                    log::debug!("walk exhausted after {} commits", self.commit_count);
                    self.exhausted = true;
                }
            }
        }
        Ok(())
    }

    fn enter(&mut self, mut node: GraphNode) -> Result<(), GraphError> {
        let oid = node.oid();
        let row = self.nodes.len();

        if self.rows.contains_key(&oid) {
            return Err(GraphError::DuplicateCommit(oid));
        }
        if let Some(parent) = node.parents().iter().find(|p| self.rows.contains_key(*p)) {
            return Err(GraphError::OutOfOrder {
                child: oid,
                parent: *parent,
            });
        }

        for child in self.history_oids.take(&oid) {
            node.add_child(child);
        }

        let live: Vec<GraphLane> = self.lane_manager.live().collect();

        // first claim keeps the column, the others fork off here
        let mut incoming = self.lane_manager.incoming(&oid).into_iter();
        let lane = match incoming.next() {
            Some(claim) => claim.lane,
            None => self.lane_manager.allocate(),
        };
        node.set_lane(lane);
        let forking: Vec<GraphLane> = incoming.map(|claim| claim.lane).collect();
        for forking_lane in &forking {
            node.add_forking_off_lane(*forking_lane);
        }

        let parents = distinct_parents(node.parents());
        if let Some((first, rest)) = parents.split_first() {
            self.lane_manager.claim(lane, *first, true);
            node.push_parent_lane(lane);

            for parent in rest {
                let merging = match self.lane_manager.lane_for(parent) {
                    Some(existing) if existing != lane => existing,
                    _ => {
                        let fresh = self.lane_manager.allocate();
                        self.lane_manager.claim(fresh, *parent, false);
                        fresh
                    }
                };
                node.add_merging_lane(merging);
                node.push_parent_lane(merging);
            }
        }

        for passing in live {
            if passing != lane
                && !forking.contains(&passing)
                && !node.merging_lanes().contains(&passing)
            {
                node.add_passing_lane(passing);
            }
        }

        for forking_lane in forking {
            self.lane_manager.retire(forking_lane);
        }
        if parents.is_empty() {
            self.lane_manager.retire(lane);
        }
        for parent in &parents {
            self.history_oids.add_history(*parent, oid);
        }

        log::trace!(
            "row {row}: {oid} lane {} ({} forking, {} passing, {} merging)",
            lane.position(),
            node.forking_off_lanes().len(),
            node.passing_lanes().len(),
            node.merging_lanes().len(),
        );

        if !node.is_uncommitted() {
            self.commit_count += 1;
        }
        self.rows.insert(oid, row);
        self.nodes.push(node);
        Ok(())
    }

    /// Widest row of the laid-out graph, in columns.
    pub fn calc_max_line(&mut self) -> usize {
        self.max_line = max_line(&self.nodes);
        self.max_line
    }

    pub fn max_line(&self) -> usize {
        self.max_line
    }

    /// Widest the lane pool got while laying out.
    pub fn lane_high_water(&self) -> usize {
        self.lane_manager.high_water()
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Real commits laid out, the placeholder excluded.
    pub fn commit_count(&self) -> usize {
        self.commit_count
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn node(&self, row: usize) -> Option<&GraphNode> {
        self.nodes.get(row)
    }

    pub fn row_of(&self, oid: &Oid) -> Option<usize> {
        self.rows.get(oid).copied()
    }

    pub fn find(&self, oid: &Oid) -> Option<&GraphNode> {
        self.row_of(oid).map(|row| &self.nodes[row])
    }

    /// Releases the walk and freezes the result.
    pub fn finish(mut self) -> GraphLog {
        self.source = None;
        self.calc_max_line();
        if self.history_oids.pending() > 0 {
            log::debug!(
                "{} parents lie below the last row",
                self.history_oids.pending()
            );
        }
        GraphLog {
            nodes: self.nodes,
            rows: self.rows,
            max_line: self.max_line,
        }
    }
}

/// A finished graph, ready to render.
#[derive(Debug, Clone, Default)]
pub struct GraphLog {
    nodes: Vec<GraphNode>,
    rows: HashMap<Oid, usize>,
    max_line: usize,
}

impl GraphLog {
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, row: usize) -> Option<&GraphNode> {
        self.nodes.get(row)
    }

    pub fn row_of(&self, oid: &Oid) -> Option<usize> {
        self.rows.get(oid).copied()
    }

    pub fn find(&self, oid: &Oid) -> Option<&GraphNode> {
        self.row_of(oid).map(|row| &self.nodes[row])
    }

    /// Panics if `nth >= node.child_count()`.
    pub fn child_node(&self, node: &GraphNode, nth: usize) -> &GraphNode {
        let child = node.child(nth);
        match self.find(&child) {
            Some(child) => child,
            None => panic!("child {child} of {} is not in the log", node.oid()),
        }
    }

    pub fn max_line(&self) -> usize {
        self.max_line
    }

    pub fn edges(&self) -> Vec<Edge> {
        EdgeManager::from_log(self)
    }
}

fn max_line(nodes: &[GraphNode]) -> usize {
    nodes
        .iter()
        .filter_map(|node| node.row_lanes().map(|lane| lane.position() + 1).max())
        .max()
        .unwrap_or(0)
}

fn distinct_parents(parents: &[Oid]) -> Vec<Oid> {
    let mut distinct = Vec::with_capacity(parents.len());
    for parent in parents {
        if !distinct.contains(parent) {
            distinct.push(*parent);
        }
    }
    distinct
}
