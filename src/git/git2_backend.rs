use anyhow::{Context, Result, anyhow};
use git2::{
    BranchType, Cred, FetchOptions, RemoteCallbacks, Repository, ResetType,
    build::{CheckoutBuilder, RepoBuilder},
};
use std::path::Path;

/// Build a `FetchOptions` with credentials for the remote.
///
/// When an API token is configured it is sent as a username/password pair
/// over HTTPS, which is how GitHub expects token authentication for clone
/// and fetch. Without a token the user's SSH agent is tried, falling back
/// to default credentials.
fn fetch_opts_with_creds(token: Option<&str>) -> FetchOptions<'static> {
    let mut cb = RemoteCallbacks::new();
    let token = token.map(str::to_string);
    cb.credentials(move |_url, username_from_url, _allowed| {
        if let Some(tok) = token.as_deref() {
            Cred::userpass_plaintext(tok, "")
        } else {
            Cred::ssh_key_from_agent(username_from_url.unwrap_or("git")).or_else(|_| Cred::default())
        }
    });

    let mut fo = FetchOptions::new();
    fo.remote_callbacks(cb);
    fo
}

/// Perform `git fetch origin` to update remote refs.
///
/// This fetches both branches and tags from `origin` into the local
/// repository, so that every remote branch is present in the mirror.
///
/// # Errors
/// Returns an error if the fetch operation fails.
fn fetch_origin(repo: &Repository, token: Option<&str>) -> Result<()> {
    let mut fo = fetch_opts_with_creds(token);

    let mut remote = repo.find_remote("origin")?;
    remote
        .fetch(
            &[
                "refs/heads/*:refs/remotes/origin/*",
                "refs/tags/*:refs/tags/*",
            ],
            Some(&mut fo),
            None,
        )
        .context("git fetch origin")?;
    Ok(())
}

/// Attach to the remote's default branch (origin/HEAD), creating a local
/// tracking branch if necessary, and move the worktree to the remote tip.
///
/// Fallbacks are tried in order if `origin/HEAD` is missing:
/// `refs/remotes/origin/main` → `refs/remotes/origin/master`.
///
/// # Errors
/// Returns an error if no suitable default branch can be found or checkout fails.
fn attach_default_branch(repo: &Repository) -> Result<()> {
    let target_remote_ref = if let Ok(origin_head) = repo.find_reference("refs/remotes/origin/HEAD")
    {
        origin_head
            .symbolic_target()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("origin/HEAD has no symbolic target"))?
    } else if repo.find_reference("refs/remotes/origin/main").is_ok() {
        "refs/remotes/origin/main".to_string()
    } else if repo.find_reference("refs/remotes/origin/master").is_ok() {
        "refs/remotes/origin/master".to_string()
    } else {
        return Err(anyhow!(
            "could not determine default branch (missing origin/HEAD, origin/main, origin/master)"
        ));
    };

    let branch_name = target_remote_ref
        .strip_prefix("refs/remotes/origin/")
        .ok_or_else(|| anyhow!("unexpected remote ref: {}", target_remote_ref))?;

    let remote_tip = repo.find_reference(&target_remote_ref)?.peel_to_commit()?;

    let local_ref = match repo.find_branch(branch_name, BranchType::Local) {
        Ok(b) => b.into_reference(),
        Err(_) => {
            let mut b = repo.branch(branch_name, &remote_tip, true)?;
            b.set_upstream(Some(&format!("origin/{}", branch_name)))?;
            b.into_reference()
        }
    };

    repo.set_head(
        local_ref
            .name()
            .ok_or_else(|| anyhow!("invalid reference name"))?,
    )?;
    repo.reset(remote_tip.as_object(), ResetType::Hard, None)?;
    repo.checkout_head(Some(CheckoutBuilder::new().force()))?;
    Ok(())
}

/// Clone a remote repository into `dest`.
///
/// After the initial clone a full `fetch origin` pulls in every remote
/// branch and tag, so the mirror is not limited to the default branch.
///
/// # Errors
/// Returns an error if cloning or the follow-up fetch fails. On failure a
/// partially written `dest` may remain on disk for operator inspection;
/// no rollback is attempted.
pub fn clone_mirror(url: &str, dest: &Path, token: Option<&str>) -> Result<()> {
    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch_opts_with_creds(token));

    let repo = builder
        .clone(url, dest)
        .with_context(|| format!("git clone {}", url))?;

    fetch_origin(&repo, token)?;
    Ok(())
}

/// Update an existing mirror: fetch from origin and move the worktree to
/// the tip of the remote default branch.
///
/// # Errors
/// - Returns an error if `dest` is not a valid working copy
///   (`Repository::open` fails).
/// - Returns an error if the fetch or checkout fails.
pub fn update_mirror(dest: &Path, token: Option<&str>) -> Result<()> {
    let repo = Repository::open(dest)
        .with_context(|| format!("not a valid working copy: {}", dest.display()))?;
    fetch_origin(&repo, token)?;
    attach_default_branch(&repo)?;
    Ok(())
}
