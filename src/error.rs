use git2::Oid;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),
    #[error("commit {parent} was produced before its child {child}")]
    OutOfOrder { child: Oid, parent: Oid },
    #[error("commit {0} was produced twice")]
    DuplicateCommit(Oid),
    #[error("uncommitted changes must be added before the list is filled")]
    UncommittedAfterFill,
    #[error("no commit source bound to the list")]
    NoSource,
    #[error("graph construction cancelled")]
    Cancelled,
}
