use anyhow::Result;
use std::path::Path;

use crate::git::{clone_mirror, update_mirror};
use crate::measure::dir_size;

/// Tagged result of bringing one mirror up to date.
///
/// Keeping the clone/update distinction explicit (instead of a bare bool
/// threaded through the pipeline) makes the archive decision auditable:
/// a fresh clone is always new content, an update is a change only when
/// the size signature moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No mirror existed; a full clone was performed.
    Cloned,
    /// The mirror existed and was pulled.
    Updated { changed: bool },
}

impl SyncOutcome {
    /// Whether the mirror's content should be considered new.
    pub fn changed(self) -> bool {
        match self {
            SyncOutcome::Cloned => true,
            SyncOutcome::Updated { changed } => changed,
        }
    }
}

/// Materialize or update the mirror at `mirror_dir` from `url`.
///
/// - Absent mirror: clone all branches, outcome [`SyncOutcome::Cloned`].
/// - Present mirror: measure, pull, measure again; the outcome carries
///   whether the size signature moved.
///
/// # Errors
/// Returns an error when the clone or pull transport fails, or when
/// `mirror_dir` exists but is not a valid working copy. On a failed clone a
/// partially written directory may remain for operator inspection; it is
/// not removed here.
pub fn sync_repository(url: &str, mirror_dir: &Path, token: Option<&str>) -> Result<SyncOutcome> {
    if mirror_dir.exists() {
        let size_before = dir_size(mirror_dir);
        update_mirror(mirror_dir, token)?;
        let size_after = dir_size(mirror_dir);
        Ok(SyncOutcome::Updated {
            changed: size_before != size_after,
        })
    } else {
        clone_mirror(url, mirror_dir, token)?;
        Ok(SyncOutcome::Cloned)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use git2::{Repository, Signature};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    /// Create a local upstream repository with one initial commit, usable as
    /// a clone URL via its filesystem path.
    pub(crate) fn init_upstream(base: &Path, name: &str) -> PathBuf {
        let path = base.join(name);
        let repo = Repository::init(&path).unwrap();
        commit_file(&repo, "README.md", b"hello\n", "initial commit");
        path
    }

    /// Write `name` in the upstream worktree and commit it.
    pub(crate) fn commit_file(repo: &Repository, name: &str, body: &[u8], msg: &str) {
        let workdir = repo.workdir().unwrap();
        fs::write(workdir.join(name), body).unwrap();

        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();

        let sig = Signature::now("upstream", "upstream@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, msg, &tree, &parents)
            .unwrap();
    }

    #[test]
    fn fresh_clone_is_always_changed() {
        let td = tempdir().unwrap();
        let upstream = init_upstream(td.path(), "alpha");
        let mirror = td.path().join("mirrors").join("alpha");

        let outcome =
            sync_repository(upstream.to_str().unwrap(), &mirror, None).unwrap();

        assert_eq!(outcome, SyncOutcome::Cloned);
        assert!(outcome.changed());
        assert!(mirror.join(".git").exists());
        assert_eq!(fs::read(mirror.join("README.md")).unwrap(), b"hello\n");
    }

    #[test]
    fn quiet_pull_reports_unchanged() {
        let td = tempdir().unwrap();
        let upstream = init_upstream(td.path(), "alpha");
        let mirror = td.path().join("mirrors").join("alpha");
        let url = upstream.to_str().unwrap().to_string();

        sync_repository(&url, &mirror, None).unwrap();
        let outcome = sync_repository(&url, &mirror, None).unwrap();

        assert_eq!(outcome, SyncOutcome::Updated { changed: false });
        assert!(!outcome.changed());
    }

    #[test]
    fn upstream_growth_reports_changed() {
        let td = tempdir().unwrap();
        let upstream = init_upstream(td.path(), "alpha");
        let mirror = td.path().join("mirrors").join("alpha");
        let url = upstream.to_str().unwrap().to_string();

        sync_repository(&url, &mirror, None).unwrap();

        let repo = Repository::open(&upstream).unwrap();
        commit_file(&repo, "extra.txt", &[b'x'; 100], "add extra file");

        let outcome = sync_repository(&url, &mirror, None).unwrap();
        assert_eq!(outcome, SyncOutcome::Updated { changed: true });
        assert_eq!(fs::read(mirror.join("extra.txt")).unwrap(), vec![b'x'; 100]);
    }

    #[test]
    fn existing_non_repository_path_is_an_error() {
        let td = tempdir().unwrap();
        let upstream = init_upstream(td.path(), "alpha");
        let mirror = td.path().join("mirrors").join("alpha");
        fs::create_dir_all(&mirror).unwrap();
        fs::write(mirror.join("junk"), b"not a working copy").unwrap();

        let err = sync_repository(upstream.to_str().unwrap(), &mirror, None).unwrap_err();
        assert!(err.to_string().contains("not a valid working copy"));
    }
}
