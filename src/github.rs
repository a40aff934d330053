use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::config::GithubConfig;
use crate::config::load_config;

/// One repository as reported by the listing API.
///
/// Only the fields the pipeline needs are kept; everything else in the API
/// response is ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct RemoteRepo {
    pub name: String,
    pub clone_url: String,
}

const PER_PAGE: usize = 100;

/// Build a blocking HTTP client with GitHub API headers.
///
/// Sets `Accept: application/vnd.github+json`, a static user agent, and a
/// bearer `Authorization` header when a token is available.
pub fn gh_client(token: Option<&str>) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(USER_AGENT, HeaderValue::from_static("gitsnap-backup"));
    if let Some(tok) = token {
        headers.insert(
            "Authorization",
            HeaderValue::from_str(&format!("Bearer {}", tok))?,
        );
    }
    let client = Client::builder().default_headers(headers).build()?;
    Ok(client)
}

/// List every repository owned by the configured account.
///
/// With a token the authenticated listing endpoint is used
/// (`/user/repos?affiliation=owner`), so private repositories are included.
/// Without a token only the public listing for `user` is available.
///
/// Pages of up to 100 entries are fetched until a short page; results are
/// returned in API order.
///
/// # Errors
/// Returns an error if any request fails or returns a non-success status.
/// A listing failure is fatal to the run; there is nothing to back up
/// without the list.
pub fn list_repositories(
    client: &Client,
    gh: &GithubConfig,
    authenticated: bool,
) -> Result<Vec<RemoteRepo>> {
    let url = if authenticated {
        format!("{}/user/repos", gh.api_url)
    } else {
        format!("{}/users/{}/repos", gh.api_url, gh.user)
    };

    let mut repos: Vec<RemoteRepo> = Vec::new();
    for page in 1.. {
        let mut req = client.get(&url).query(&[
            ("per_page", PER_PAGE.to_string()),
            ("page", page.to_string()),
        ]);
        if authenticated {
            req = req.query(&[("affiliation", "owner")]);
        }
        let batch: Vec<RemoteRepo> = req
            .send()
            .and_then(|r| r.error_for_status())
            .with_context(|| format!("listing repositories for {}", gh.user))?
            .json()?;

        let short_page = batch.len() < PER_PAGE;
        repos.extend(batch);
        if short_page {
            break;
        }
    }
    Ok(repos)
}

/// CLI command: print the repositories the account owns remotely.
///
/// Example output:
/// ```text
/// - alpha (https://github.com/someone/alpha.git)
/// - beta (https://github.com/someone/beta.git)
/// ```
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or the listing
/// request fails.
pub fn cmd_list() -> Result<()> {
    let cfg = load_config()?;
    let token = cfg.github.token();
    let client = gh_client(token.as_deref())?;
    let repos = list_repositories(&client, &cfg.github, token.is_some())?;

    for repo in &repos {
        println!("- {} ({})", repo.name, repo.clone_url);
    }
    Ok(())
}
