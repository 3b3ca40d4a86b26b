//! File lookups in the working tree or at a revision

use std::path::Path;

use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};

impl GitRepo {
    /// Read a UTF-8 file from the repository.
    ///
    /// With a revision the blob is read from that commit's tree; without
    /// one the working tree is used. A missing file yields `Ok(None)`.
    #[instrument(skip(self))]
    pub fn read_file(&self, path: &str, rev: Option<&str>) -> Result<Option<String>> {
        match rev {
            Some(rev) => self.read_file_at(path, rev),
            None => Ok(self.read_worktree_file(path)),
        }
    }

    fn read_file_at(&self, path: &str, rev: &str) -> Result<Option<String>> {
        let commit = self.resolve_commit(rev)?;
        let tree = commit.tree()?;

        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(e) if e.code() == git2::ErrorCode::NotFound => {
                debug!(path, rev, "file not present at revision");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let object = entry.to_object(&self.repo)?;
        let Some(blob) = object.as_blob() else {
            return Ok(None);
        };

        Ok(std::str::from_utf8(blob.content())
            .ok()
            .map(|s| s.to_string()))
    }

    fn read_worktree_file(&self, path: &str) -> Option<String> {
        let full_path = self.workdir()?.join(path);
        std::fs::read_to_string(&full_path).ok()
    }
}

#[cfg(test)]
mod tests {
    use crate::GitRepo;
    use git2::{Repository, Signature};
    use std::path::Path;
    use tempfile::TempDir;

    fn setup_repo_with_changelog() -> (TempDir, GitRepo) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();
        let sig = Signature::now("Test", "test@example.com").unwrap();

        std::fs::write(temp.path().join("CHANGELOG.md"), "## [1.0.0]\n### Added\n- a\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("CHANGELOG.md")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let oid = repo
            .commit(Some("HEAD"), &sig, &sig, "docs: changelog", &tree, &[])
            .unwrap();
        let commit = repo.find_commit(oid).unwrap();
        repo.tag_lightweight("v1.0.0", commit.as_object(), false)
            .unwrap();

        std::fs::write(temp.path().join("CHANGELOG.md"), "## [1.1.0]\n").unwrap();

        let git_repo = GitRepo::open(temp.path()).unwrap();
        (temp, git_repo)
    }

    #[test]
    fn test_read_worktree_file() {
        let (_temp, repo) = setup_repo_with_changelog();
        let content = repo.read_file("CHANGELOG.md", None).unwrap().unwrap();
        assert!(content.contains("1.1.0"));
    }

    #[test]
    fn test_read_file_at_tag() {
        let (_temp, repo) = setup_repo_with_changelog();
        let content = repo
            .read_file("CHANGELOG.md", Some("v1.0.0"))
            .unwrap()
            .unwrap();
        assert!(content.contains("1.0.0"));
        assert!(!content.contains("1.1.0"));
    }

    #[test]
    fn test_missing_file() {
        let (_temp, repo) = setup_repo_with_changelog();
        assert!(repo.read_file("HISTORY.md", Some("v1.0.0")).unwrap().is_none());
        assert!(repo.read_file("HISTORY.md", None).unwrap().is_none());
    }
}
