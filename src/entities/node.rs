use git2::Oid;

use crate::entities::commit::CommitInfo;
use crate::entities::lane::GraphLane;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    LocalBranch,
    RemoteBranch,
    Tag,
    Other,
}

/// A named reference resolving to a node's commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    pub name: String,
    pub target: Oid,
    pub kind: RefKind,
}

impl NodeRef {
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        let name = name.into();
        let kind = if name.starts_with("refs/heads/") {
            RefKind::LocalBranch
        } else if name.starts_with("refs/remotes/") {
            RefKind::RemoteBranch
        } else if name.starts_with("refs/tags/") {
            RefKind::Tag
        } else {
            RefKind::Other
        };
        Self { name, target, kind }
    }

    pub fn shorthand(&self) -> &str {
        ["refs/heads/", "refs/remotes/", "refs/tags/"]
            .iter()
            .find_map(|prefix| self.name.strip_prefix(prefix))
            .unwrap_or(&self.name)
    }
}

/// One row of the laid-out graph.
#[derive(Debug, Clone)]
pub struct GraphNode {
    commit: CommitInfo,
    lane: Option<GraphLane>,
    forking_off_lanes: Vec<GraphLane>,
    passing_lanes: Vec<GraphLane>,
    merging_lanes: Vec<GraphLane>,
    parent_lanes: Vec<GraphLane>,
    children: Vec<Oid>,
    refs: Vec<NodeRef>,
}

impl GraphNode {
    pub fn new(commit: CommitInfo) -> Self {
        Self {
            commit,
            lane: None,
            forking_off_lanes: Vec::new(),
            passing_lanes: Vec::new(),
            merging_lanes: Vec::new(),
            parent_lanes: Vec::new(),
            children: Vec::new(),
            refs: Vec::new(),
        }
    }

    pub fn with_refs(mut self, refs: Vec<NodeRef>) -> Self {
        self.refs = refs;
        self
    }

    pub fn commit(&self) -> &CommitInfo {
        &self.commit
    }

    pub fn oid(&self) -> Oid {
        self.commit.oid
    }

    pub fn parents(&self) -> &[Oid] {
        &self.commit.parents
    }

    pub fn parent_count(&self) -> usize {
        self.commit.parents.len()
    }

    pub fn is_uncommitted(&self) -> bool {
        self.commit.is_uncommitted()
    }

    /// `None` until the node has been laid out.
    pub fn lane(&self) -> Option<GraphLane> {
        self.lane
    }

    pub fn forking_off_lanes(&self) -> &[GraphLane] {
        &self.forking_off_lanes
    }

    pub fn passing_lanes(&self) -> &[GraphLane] {
        &self.passing_lanes
    }

    pub fn merging_lanes(&self) -> &[GraphLane] {
        &self.merging_lanes
    }

    /// Lane each distinct parent edge runs down, in parent order.
    pub fn parent_lanes(&self) -> &[GraphLane] {
        &self.parent_lanes
    }

    /// Every lane present at this node's row.
    pub fn row_lanes(&self) -> impl Iterator<Item = GraphLane> + '_ {
        self.lane
            .iter()
            .copied()
            .chain(self.passing_lanes.iter().copied())
            .chain(self.forking_off_lanes.iter().copied())
            .chain(self.merging_lanes.iter().copied())
    }

    pub fn children(&self) -> &[Oid] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Panics if `nth >= child_count()`.
    pub fn child(&self, nth: usize) -> Oid {
        self.children[nth]
    }

    pub fn is_child(&self, oid: &Oid) -> bool {
        self.children.contains(oid)
    }

    pub fn refs(&self) -> &[NodeRef] {
        &self.refs
    }

    pub fn ref_count(&self) -> usize {
        self.refs.len()
    }

    /// Panics if `nth >= ref_count()`.
    pub fn get_ref(&self, nth: usize) -> &NodeRef {
        &self.refs[nth]
    }

    pub(crate) fn set_lane(&mut self, lane: GraphLane) {
        debug_assert!(self.lane.is_none(), "lane assigned twice for {}", self.oid());
        self.lane = Some(lane);
    }

    pub fn add_forking_off_lane(&mut self, lane: GraphLane) {
        add_lane(&mut self.forking_off_lanes, lane);
    }

    pub fn add_passing_lane(&mut self, lane: GraphLane) {
        add_lane(&mut self.passing_lanes, lane);
    }

    pub fn add_merging_lane(&mut self, lane: GraphLane) {
        add_lane(&mut self.merging_lanes, lane);
    }

    pub(crate) fn push_parent_lane(&mut self, lane: GraphLane) {
        self.parent_lanes.push(lane);
    }

    pub fn add_child(&mut self, child: Oid) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// Drops everything the layout derived, keeping the commit and its refs.
    pub fn reset(&mut self) {
        self.lane = None;
        self.forking_off_lanes.clear();
        self.passing_lanes.clear();
        self.merging_lanes.clear();
        self.parent_lanes.clear();
        self.children.clear();
    }
}

fn add_lane(lanes: &mut Vec<GraphLane>, lane: GraphLane) {
    if !lanes.contains(&lane) {
        lanes.push(lane);
    }
}
