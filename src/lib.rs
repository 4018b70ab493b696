//! Commit graph layout for log views.
//!
//! A [`GraphWalk`] streams commits children first, [`GraphCommitList`] gives each one a
//! lane as it arrives, and [`GraphLog`] is the frozen result a renderer draws from.

pub mod color;
pub mod commit_list;
pub mod config;
pub mod entities;
pub mod error;
pub mod history_oid;
pub mod log_graph;
pub mod walk;

pub use commit_list::{GraphCommitList, GraphLog};
pub use entities::commit::CommitInfo;
pub use entities::edge::{Edge, EdgeKind, EdgeManager};
pub use entities::lane::{GraphLane, LaneId, LaneManager};
pub use entities::node::{GraphNode, NodeRef, RefKind};
pub use error::GraphError;
pub use log_graph::{LogError, LogOptions, get_log, has_uncommitted_changes};
pub use walk::{CommitSource, GraphWalk, NodeQueue};
