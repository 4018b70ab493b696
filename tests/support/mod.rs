#![allow(dead_code)]

use git2::{Commit, Oid, Repository, Signature, Time};
use tempfile::TempDir;

/// Throw-away repository with commits on an empty tree.
pub struct TestRepo {
    pub repo: Repository,
    pub dir: TempDir,
    tree: Oid,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        let tree = repo.treebuilder(None).unwrap().write().unwrap();
        Self { repo, dir, tree }
    }

    pub fn commit(&self, message: &str, time: i64, parents: &[Oid]) -> Oid {
        let signature = Signature::new("Pig", "pig@example.com", &Time::new(time, 0)).unwrap();
        let tree = self.repo.find_tree(self.tree).unwrap();
        let parents: Vec<Commit<'_>> = parents
            .iter()
            .map(|parent| self.repo.find_commit(*parent).unwrap())
            .collect();
        let parents: Vec<&Commit<'_>> = parents.iter().collect();
        self.repo
            .commit(None, &signature, &signature, message, &tree, &parents)
            .unwrap()
    }

    /// `count` commits on top of each other, newest last.
    pub fn chain(&self, count: usize, start_time: i64) -> Vec<Oid> {
        let mut commits: Vec<Oid> = Vec::with_capacity(count);
        for i in 0..count {
            let parents: Vec<Oid> = commits.last().copied().into_iter().collect();
            let time = start_time + i as i64 * 60;
            commits.push(self.commit(&format!("commit {i}"), time, &parents));
        }
        commits
    }

    pub fn reference(&self, name: &str, target: Oid) {
        self.repo.reference(name, target, true, "test").unwrap();
    }

    pub fn branch(&self, name: &str, target: Oid) {
        self.reference(&format!("refs/heads/{name}"), target);
    }

    /// Creates `name` at `target` and points HEAD at it.
    pub fn checkout(&self, name: &str, target: Oid) {
        self.branch(name, target);
        self.repo.set_head(&format!("refs/heads/{name}")).unwrap();
    }

    pub fn tag(&self, name: &str, target: Oid) {
        self.reference(&format!("refs/tags/{name}"), target);
    }

    pub fn annotated_tag(&self, name: &str, target: Oid) {
        let object = self.repo.find_object(target, None).unwrap();
        let signature = Signature::new("Pig", "pig@example.com", &Time::new(0, 0)).unwrap();
        self.repo
            .tag(name, &object, &signature, "release", true)
            .unwrap();
    }

    /// Leaves the repository mid-rebase with REBASE_HEAD at `rebase_head`.
    pub fn start_rebase(&self, rebase_head: Oid) {
        let git_dir = self.repo.path();
        std::fs::create_dir_all(git_dir.join("rebase-merge")).unwrap();
        std::fs::write(git_dir.join("REBASE_HEAD"), format!("{rebase_head}\n")).unwrap();
    }

    pub fn empty_tree(&self) -> Oid {
        self.tree
    }

    pub fn write_file(&self, name: &str, contents: &str) {
        std::fs::write(self.dir.path().join(name), contents).unwrap();
    }
}
