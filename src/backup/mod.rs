mod jobs;
mod sync;

use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::archive::archive_dir;
use crate::config::{Config, DirectoryConfig, load_config};
use crate::github::{RemoteRepo, gh_client, list_repositories};

use jobs::build_jobs;
use sync::sync_repository;

/// Spinner style used during ongoing operations.
fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[33m{spinner}\x1b[0m {wide_msg}")
        .unwrap()
        .tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"])
}

/// Style used when an operation finishes successfully.
fn ok_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[32m✔\x1b[0m {wide_msg}").unwrap()
}

/// Style used when an operation fails with an error.
fn err_style() -> ProgressStyle {
    ProgressStyle::with_template("\x1b[31m✘\x1b[0m {wide_msg}").unwrap()
}

/// Whether a repository needs its archive (re)written.
///
/// Archiving is skipped only when an archive already exists **and** the
/// just-completed sync reported no change. A missing archive is always
/// written regardless of the changed flag, so deleting an archive by hand
/// repairs itself on the next run.
fn should_archive(archive_exists: bool, changed: bool) -> bool {
    !archive_exists || changed
}

/// Run the backup pipeline over an already-fetched repository list.
///
/// High-level flow:
/// 1. Ensure the mirror and archive roots exist.
/// 2. Build one job per repository (see [`jobs::build_jobs`]).
/// 3. Process jobs on a rayon worker pool with one progress spinner each:
///    sync the mirror (clone or pull), then write the zip archive unless it
///    is already present and nothing changed. Each repository's
///    sync-then-archive sequence runs inside a single closure, and job paths
///    are disjoint by repository name, so workers never touch the same
///    mirror.
/// 4. Collect the archives written, in the order the provider listed the
///    repositories.
///
/// A failing repository finishes its spinner with the error and does not
/// abort the others; only the returned list reflects what was actually
/// written.
pub fn run_backup(
    dirs: &DirectoryConfig,
    token: Option<&str>,
    repos: &[RemoteRepo],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&dirs.repositories).with_context(|| {
        format!(
            "cannot create repositories root {}",
            dirs.repositories.display()
        )
    })?;
    fs::create_dir_all(&dirs.archives)
        .with_context(|| format!("cannot create archives root {}", dirs.archives.display()))?;

    let jobs = build_jobs(repos, dirs);

    let mp = MultiProgress::new();
    let run_style = spinner_style();
    let done_style = ok_style();
    let fail_style = err_style();

    let mut bars: Vec<ProgressBar> = Vec::with_capacity(jobs.len());
    for j in &jobs {
        let pb = mp.add(ProgressBar::new_spinner());
        pb.set_style(run_style.clone());
        pb.set_message(format!("backing up {}", j.name));
        pb.enable_steady_tick(Duration::from_millis(80));
        bars.push(pb);
    }

    let written: Vec<Option<PathBuf>> = jobs
        .par_iter()
        .enumerate()
        .map(|(idx, job)| {
            let pb = &bars[idx];
            let res: Result<Option<PathBuf>> = (|| {
                let outcome = sync_repository(&job.url, &job.mirror_dir, token)
                    .with_context(|| format!("sync {}", job.name))?;

                if !should_archive(job.archive_path.exists(), outcome.changed()) {
                    return Ok(None);
                }

                pb.set_message(format!("archiving {}", job.name));
                archive_dir(&job.mirror_dir, &job.archive_path)
                    .with_context(|| format!("archive {}", job.name))?;
                Ok(Some(job.archive_path.clone()))
            })();

            match res {
                Ok(Some(path)) => {
                    pb.set_style(done_style.clone());
                    pb.finish_with_message(format!("archived {}", job.name));
                    Some(path)
                }
                Ok(None) => {
                    pb.set_style(done_style.clone());
                    pb.finish_with_message(format!("{} unchanged, archive kept", job.name));
                    None
                }
                Err(e) => {
                    pb.set_style(fail_style.clone());
                    pb.finish_with_message(format!("backing up {} (error: {:#})", job.name, e));
                    None
                }
            }
        })
        .collect();

    Ok(written.into_iter().flatten().collect())
}

/// CLI command: back up every repository of the configured account.
///
/// Fetches the repository list from GitHub, runs [`run_backup`], and prints
/// a summary. A listing failure is fatal; per-repository failures are shown
/// on their own progress line and the run continues.
pub fn cmd_backup() -> Result<()> {
    let cfg: Config = load_config()?;
    let token = cfg.github.token();
    let client = gh_client(token.as_deref())?;
    let repos = list_repositories(&client, &cfg.github, token.is_some())?;

    println!("repositories: {}", repos.len());

    let written = run_backup(&cfg.directory, token.as_deref(), &repos)?;

    if written.is_empty() {
        println!("backup completed, no updated archives");
    } else {
        println!("backup completed, {} archive(s) written:", written.len());
        for path in &written {
            println!("- {}", path.file_name().unwrap_or_default().to_string_lossy());
        }
    }
    Ok(())
}
