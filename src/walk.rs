use std::collections::{HashMap, HashSet, VecDeque};

use git2::{Oid, Repository, Revwalk, Sort};

use crate::entities::commit::CommitInfo;
use crate::entities::node::{GraphNode, NodeRef};
use crate::error::GraphError;

/// Produces commits for the layout.
///
/// Implementations must never yield a commit before every child of it that is also
/// part of the walk, and should break ties newest first. [`GraphCommitList`] rejects
/// sources that violate the first rule.
///
/// [`GraphCommitList`]: crate::commit_list::GraphCommitList
pub trait CommitSource {
    fn next_node(&mut self) -> Result<Option<GraphNode>, GraphError>;
}

/// Revision walk over a git2 repository yielding [`GraphNode`]s.
pub struct GraphWalk<'repo> {
    repo: &'repo Repository,
    revwalk: Revwalk<'repo>,
    marked: HashSet<Oid>,
    refs: HashMap<Oid, Vec<NodeRef>>,
}

impl<'repo> GraphWalk<'repo> {
    pub fn new(repo: &'repo Repository) -> Result<Self, GraphError> {
        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        Ok(Self {
            repo,
            revwalk,
            marked: HashSet::new(),
            refs: HashMap::new(),
        })
    }

    /// Returns `false` when the commit was already marked.
    pub fn mark_start(&mut self, oid: Oid) -> Result<bool, GraphError> {
        if self.marked.contains(&oid) {
            return Ok(false);
        }
        let commit = self.repo.find_commit(oid)?;
        self.revwalk.push(commit.id())?;
        self.marked.insert(oid);
        log::trace!("marked start {oid}");
        Ok(true)
    }

    /// Marks every reference under `prefix` (e.g. `refs/heads/`) and remembers it so the
    /// produced node carries it. Returns how many references were recorded.
    pub fn mark_start_all_refs(&mut self, prefix: &str) -> Result<usize, GraphError> {
        let repo = self.repo;
        let mut recorded = 0;
        for reference in repo.references_glob(&format!("{prefix}*"))? {
            let reference = reference?;
            let Some(name) = reference.name() else {
                log::debug!("skipping reference with a non utf-8 name");
                continue;
            };
            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit,
                Err(error) => {
                    log::debug!("skipping {name}: {}", error.message());
                    continue;
                }
            };

            let oid = commit.id();
            let entry = self.refs.entry(oid).or_default();
            if entry.iter().any(|r| r.name == name) {
                continue;
            }
            entry.push(NodeRef::new(name, oid));
            recorded += 1;
            self.mark_start(oid)?;
        }
        log::debug!("marked {recorded} references under {prefix}");
        Ok(recorded)
    }

    pub fn is_marked(&self, oid: &Oid) -> bool {
        self.marked.contains(oid)
    }
}

impl CommitSource for GraphWalk<'_> {
    fn next_node(&mut self) -> Result<Option<GraphNode>, GraphError> {
        let Some(oid) = self.revwalk.next() else {
            return Ok(None);
        };
        let commit = self.repo.find_commit(oid?)?;
        let refs = self.refs.remove(&commit.id()).unwrap_or_default();
        Ok(Some(GraphNode::new(CommitInfo::from_commit(&commit)).with_refs(refs)))
    }
}

/// Commits already sorted children first, served in order.
#[derive(Debug, Default)]
pub struct NodeQueue {
    nodes: VecDeque<GraphNode>,
}

impl NodeQueue {
    pub fn new(commits: impl IntoIterator<Item = CommitInfo>) -> Self {
        Self {
            nodes: commits.into_iter().map(GraphNode::new).collect(),
        }
    }
}

impl CommitSource for NodeQueue {
    fn next_node(&mut self) -> Result<Option<GraphNode>, GraphError> {
        Ok(self.nodes.pop_front())
    }
}
