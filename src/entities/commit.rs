use chrono::{DateTime, FixedOffset};
use git2::{Commit, Oid, Time};

/// The commit record a [`GraphNode`](super::node::GraphNode) decorates.
#[derive(Debug, Clone)]
pub struct CommitInfo {
    pub oid: Oid,
    pub message: String,
    pub author: String,
    pub timestamp: Time,
    pub parents: Vec<Oid>,
}

impl CommitInfo {
    pub fn new(
        oid: Oid,
        message: String,
        author: String,
        timestamp: Time,
        parents: Vec<Oid>,
    ) -> Self {
        CommitInfo {
            oid,
            message,
            author,
            timestamp,
            parents,
        }
    }

    pub fn from_commit(commit: &Commit<'_>) -> Self {
        Self::new(
            commit.id(),
            commit.message().unwrap_or_default().to_string(),
            commit.author().email().unwrap_or_default().to_string(),
            commit.time(),
            commit.parent_ids().collect(),
        )
    }

    /// Placeholder for the working tree. Uses the zero id, which never names a stored object.
    pub fn uncommitted(head: Oid) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self::new(
            Oid::zero(),
            "Uncommitted changes".to_string(),
            String::new(),
            Time::new(now, 0),
            vec![head],
        )
    }

    pub fn is_uncommitted(&self) -> bool {
        self.oid.is_zero()
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or(&self.message)
    }

    pub fn date_time(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(self.timestamp.offset_minutes() * 60)?;
        DateTime::from_timestamp(self.timestamp.seconds(), 0).map(|utc| utc.with_timezone(&offset))
    }
}
