//! Commit history operations

use chrono::{TimeZone, Utc};
use git2::Sort;
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::CommitInfo;

impl GitRepo {
    /// Commits reachable from `head` but not from `base`, newest first.
    ///
    /// Without a base the walk covers the whole history behind `head`.
    /// At most `limit` commits are returned.
    #[instrument(skip(self))]
    pub fn commits_between(
        &self,
        base: Option<&str>,
        head: &str,
        limit: usize,
    ) -> Result<Vec<CommitInfo>> {
        let head_commit = self.resolve_commit(head)?;

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(head_commit.id())?;

        if let Some(base) = base {
            let base_commit = self.resolve_commit(base)?;
            revwalk.hide(base_commit.id())?;
        }

        let mut commits = Vec::new();
        for oid in revwalk.take(limit) {
            let oid = oid?;
            let commit = self.repo.find_commit(oid)?;
            commits.push(commit_to_info(&commit));
        }

        debug!(count = commits.len(), "collected commits");
        Ok(commits)
    }

    /// Get the most recent N commits behind HEAD
    pub fn recent_commits(&self, count: usize) -> Result<Vec<CommitInfo>> {
        if !self.has_commits() {
            return Ok(Vec::new());
        }
        self.commits_between(None, "HEAD", count)
    }
}

/// Convert a git2 Commit to CommitInfo
fn commit_to_info(commit: &git2::Commit<'_>) -> CommitInfo {
    let hash = commit.id().to_string();
    let author = commit.author();

    let message = commit.summary().unwrap_or("(no message)").to_string();

    let body = commit.body().map(|b| b.to_string());

    let timestamp = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or_else(Utc::now);

    CommitInfo::new(hash, message, author.name().unwrap_or("Unknown"), timestamp)
        .with_body(body.unwrap_or_default())
        .with_parent_count(commit.parent_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::path::Path;
    use tempfile::TempDir;

    fn commit_file(repo: &Repository, dir: &Path, name: &str, message: &str) -> git2::Oid {
        let sig = Signature::now("Test", "test@example.com").unwrap();
        std::fs::write(dir.join(name), message).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();

        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parents: Vec<git2::Commit<'_>> = repo
            .head()
            .ok()
            .and_then(|h| h.peel_to_commit().ok())
            .into_iter()
            .collect();
        let parent_refs: Vec<&git2::Commit<'_>> = parents.iter().collect();

        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap()
    }

    fn setup_repo_with_history() -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let first = commit_file(&repo, temp.path(), "a.txt", "chore: initial commit");
        let commit = repo.find_commit(first).unwrap();
        repo.tag_lightweight("v1.0.0", commit.as_object(), false)
            .unwrap();

        commit_file(&repo, temp.path(), "b.txt", "feat: add b (#12)");
        commit_file(
            &repo,
            temp.path(),
            "c.txt",
            "fix(core): repair c\n\nBREAKING CHANGE: c is gone",
        );

        let git_repo = GitRepo::open(temp.path()).unwrap();
        (temp, git_repo)
    }

    #[test]
    fn test_commits_between_tag_and_head() {
        let (_temp, repo) = setup_repo_with_history();
        let commits = repo.commits_between(Some("v1.0.0"), "HEAD", 100).unwrap();

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].message, "fix(core): repair c");
        assert_eq!(commits[0].body.as_deref(), Some("BREAKING CHANGE: c is gone"));
        assert_eq!(commits[1].message, "feat: add b (#12)");
    }

    #[test]
    fn test_commits_without_base() {
        let (_temp, repo) = setup_repo_with_history();
        let commits = repo.commits_between(None, "HEAD", 100).unwrap();
        assert_eq!(commits.len(), 3);
    }

    #[test]
    fn test_commit_limit() {
        let (_temp, repo) = setup_repo_with_history();
        let commits = repo.recent_commits(1).unwrap();
        assert_eq!(commits.len(), 1);
    }

    #[test]
    fn test_recent_commits_on_empty_repo() {
        let temp = TempDir::new().unwrap();
        Repository::init(temp.path()).unwrap();
        let repo = GitRepo::open(temp.path()).unwrap();

        assert!(repo.recent_commits(10).unwrap().is_empty());
    }
}
