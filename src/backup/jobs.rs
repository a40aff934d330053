use std::path::PathBuf;

use crate::config::DirectoryConfig;
use crate::github::RemoteRepo;

/// Represents a single repository backup job.
///
/// Each job corresponds to one repository reported by the provider and
/// contains all the information needed to mirror the repository and place
/// its archive: both paths derive from the repository name, so jobs never
/// overlap on disk.
#[derive(Debug, Clone)]
pub struct BackupJob {
    pub name: String,
    pub url: String,
    pub mirror_dir: PathBuf,
    pub archive_path: PathBuf,
}

/// Build backup jobs from the provider's repository list.
///
/// The mirror lands at `<repositories>/<name>` and the archive at
/// `<archives>/<name>.zip`. Entries with a blank name are skipped; there is
/// nowhere on disk to put them.
///
/// # Arguments
/// - `repos`: Repository descriptors as returned by the listing API.
/// - `dirs`: The two configured filesystem roots.
pub fn build_jobs(repos: &[RemoteRepo], dirs: &DirectoryConfig) -> Vec<BackupJob> {
    let mut jobs = Vec::with_capacity(repos.len());
    for repo in repos {
        if repo.name.trim().is_empty() {
            continue;
        }
        jobs.push(BackupJob {
            name: repo.name.clone(),
            url: repo.clone_url.clone(),
            mirror_dir: dirs.repositories.join(&repo.name),
            archive_path: dirs.archives.join(format!("{}.zip", repo.name)),
        });
    }
    jobs
}
