//! Crate entry point for **gitsnap**.
//!
//! This library provides the internal implementation for the `gitsnap` CLI.
//! Each submodule encapsulates one responsibility (config parsing, the GitHub
//! listing provider, git transport, change measurement, archiving, and the
//! backup pipeline that ties them together).
//! The `pub use` re-exports make selected commands accessible directly from
//! the crate root.
//!
//! This file is primarily intended for developers hacking on `gitsnap`.

mod archive;
mod backup;
mod config;
mod git;
mod github;
mod measure;
mod paths;

/// Re-export commonly used types and commands so they can be accessed from `gitsnap::*`.
pub use backup::cmd_backup;
pub use config::Config;
pub use github::{RemoteRepo, cmd_list};
pub use paths::config_home;
