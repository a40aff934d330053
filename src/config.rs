use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::paths::config_file;

/// Top-level configuration structure loaded from `config.toml`.
///
/// The file names the GitHub account to back up and the two directory roots
/// the pipeline writes to.
///
/// Example TOML:
/// ```toml
/// [github]
/// user  = "someone"
/// token = "ghp_xxx"
///
/// [directory]
/// repositories = "/backup/repositories"
/// archives     = "/backup/archives"
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    pub github: GithubConfig,
    pub directory: DirectoryConfig,
}

/// The `[github]` section: account identity and API access.
#[derive(Debug, Deserialize, Clone)]
pub struct GithubConfig {
    pub user: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

impl GithubConfig {
    /// Resolve the API token: the config value wins, `GITHUB_TOKEN` is the
    /// fallback. `None` means unauthenticated access (public repositories
    /// only).
    pub fn token(&self) -> Option<String> {
        self.token.clone().or_else(|| env::var("GITHUB_TOKEN").ok())
    }
}

/// The `[directory]` section: filesystem roots for mirrors and archives.
#[derive(Debug, Deserialize, Clone)]
pub struct DirectoryConfig {
    pub repositories: PathBuf,
    pub archives: PathBuf,
}

/// Load and parse `config.toml` into a [`Config`] structure.
///
/// # Errors
/// - Returns an error if `config.toml` cannot be read.
/// - Returns an error if parsing the TOML fails.
///
/// # Notes
/// - This always resolves the path using [`config_file()`].
/// - If the file is missing, the error message includes the resolved path.
pub fn load_config() -> Result<Config> {
    let path = config_file()?;
    let txt = fs::read_to_string(&path)
        .with_context(|| format!("config not found: {}", path.display()))?;
    parse_config(&txt)
}

/// Parse configuration from a TOML string.
pub fn parse_config(txt: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(txt).context("failed to parse config.toml")?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const FULL: &str = r#"
        [github]
        user  = "someone"
        token = "ghp_file"

        [directory]
        repositories = "/backup/repositories"
        archives     = "/backup/archives"
    "#;

    const NO_TOKEN: &str = r#"
        [github]
        user = "someone"

        [directory]
        repositories = "/backup/repositories"
        archives     = "/backup/archives"
    "#;

    #[test]
    fn parses_full_config() {
        let cfg = parse_config(FULL).unwrap();
        assert_eq!(cfg.github.user, "someone");
        assert_eq!(cfg.github.token.as_deref(), Some("ghp_file"));
        assert_eq!(cfg.github.api_url, "https://api.github.com");
        assert_eq!(
            cfg.directory.repositories,
            PathBuf::from("/backup/repositories")
        );
        assert_eq!(cfg.directory.archives, PathBuf::from("/backup/archives"));
    }

    #[test]
    fn rejects_missing_directory_section() {
        let bad = r#"
            [github]
            user = "someone"
        "#;
        assert!(parse_config(bad).is_err());
    }

    #[test]
    #[serial]
    fn file_token_wins_over_env() {
        unsafe { env::set_var("GITHUB_TOKEN", "ghp_env") };
        let cfg = parse_config(FULL).unwrap();
        assert_eq!(cfg.github.token().as_deref(), Some("ghp_file"));
        unsafe { env::remove_var("GITHUB_TOKEN") };
    }

    #[test]
    #[serial]
    fn env_token_is_the_fallback() {
        unsafe { env::set_var("GITHUB_TOKEN", "ghp_env") };
        let cfg = parse_config(NO_TOKEN).unwrap();
        assert_eq!(cfg.github.token().as_deref(), Some("ghp_env"));
        unsafe { env::remove_var("GITHUB_TOKEN") };

        let cfg = parse_config(NO_TOKEN).unwrap();
        assert_eq!(cfg.github.token(), None);
    }
}
