use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use git2::{ErrorCode, Oid, Repository, RepositoryState, StatusOptions};
use thiserror::Error;

use crate::commit_list::{GraphCommitList, GraphLog};
use crate::config::DEFAULT_COMMITS_LIMIT;
use crate::error::GraphError;
use crate::walk::GraphWalk;

pub const R_HEADS: &str = "refs/heads/";
pub const R_REMOTES: &str = "refs/remotes/";
pub const R_TAGS: &str = "refs/tags/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    pub commits_limit: usize,
    pub has_uncommitted_changes: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            commits_limit: DEFAULT_COMMITS_LIMIT,
            has_uncommitted_changes: false,
        }
    }
}

/// Building the log failed part way. `partial` holds the rows built before the failure.
#[derive(Debug, Error)]
#[error("failed to build the commit graph after {} rows: {source}", .partial.len())]
pub struct LogError {
    pub partial: GraphLog,
    #[source]
    pub source: GraphError,
}

/// Lays out the history reachable from HEAD, local branches, remotes and tags.
pub fn get_log(
    repo: &Repository,
    options: &LogOptions,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<GraphLog, LogError> {
    let mut commit_list = GraphCommitList::new();
    if let Some(flag) = cancel {
        commit_list.set_cancel_flag(flag);
    }

    let head = match head_commit(repo) {
        Ok(head) => head,
        Err(source) => {
            return Err(LogError {
                partial: commit_list.finish(),
                source,
            });
        }
    };
    let rebasing = is_rebasing(repo.state());

    let Some(head) = head.or_else(|| rebasing.then(|| rebase_head(repo)).flatten()) else {
        log::debug!("no commits to show");
        return Ok(commit_list.finish());
    };

    match fill(repo, &mut commit_list, head, rebasing, options) {
        Ok(()) => Ok(commit_list.finish()),
        Err(source) => Err(LogError {
            partial: commit_list.finish(),
            source,
        }),
    }
}

fn fill<'repo>(
    repo: &'repo Repository,
    commit_list: &mut GraphCommitList<'repo>,
    head: Oid,
    rebasing: bool,
    options: &LogOptions,
) -> Result<(), GraphError> {
    let mut walk = GraphWalk::new(repo)?;

    // during a rebase HEAD is detached on the rewritten commits, no branch points there
    walk.mark_start(head)?;
    if rebasing {
        if let Some(rebase_head) = rebase_head(repo) {
            walk.mark_start(rebase_head)?;
        }
    }

    walk.mark_start_all_refs(R_HEADS)?;
    walk.mark_start_all_refs(R_REMOTES)?;
    walk.mark_start_all_refs(R_TAGS)?;

    if options.has_uncommitted_changes {
        commit_list.add_uncommited_changes_graph_commit(head)?;
    }

    commit_list.source(walk);
    commit_list.fill_to(options.commits_limit)
}

/// `None` for an unborn branch.
fn head_commit(repo: &Repository) -> Result<Option<Oid>, GraphError> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?.id())),
        Err(error) if matches!(error.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
            Ok(None)
        }
        Err(error) => Err(error.into()),
    }
}

fn rebase_head(repo: &Repository) -> Option<Oid> {
    repo.revparse_single("REBASE_HEAD")
        .and_then(|object| object.peel_to_commit())
        .map(|commit| commit.id())
        .ok()
}

fn is_rebasing(state: RepositoryState) -> bool {
    matches!(
        state,
        RepositoryState::Rebase
            | RepositoryState::RebaseInteractive
            | RepositoryState::RebaseMerge
            | RepositoryState::ApplyMailboxOrRebase
    )
}

/// Tracked modifications or untracked files in the working tree.
pub fn has_uncommitted_changes(repo: &Repository) -> Result<bool, GraphError> {
    if repo.is_bare() {
        return Ok(false);
    }
    let mut options = StatusOptions::new();
    options
        .include_untracked(true)
        .include_ignored(false)
        .exclude_submodules(true);
    let statuses = repo.statuses(Some(&mut options))?;
    Ok(!statuses.is_empty())
}
