//! # gitsnap
//!
//! **gitsnap** mirrors a GitHub account's repositories to local disk and
//! keeps one zip snapshot per repository.
//!
//! Features:
//! - `gitsnap backup` clones or updates every repository listed for the
//!   configured account and (re)writes `<name>.zip` when content changed
//! - `gitsnap list` shows the repositories the account owns remotely
//! - `gitsnap home` prints the gitsnap config directory
//!
//! Configuration lives in `$(gitsnap home)/config.toml`.
//!
//! This CLI is built with [clap](https://docs.rs/clap).

use anyhow::Result;
use clap::{Parser, Subcommand};
use gitsnap::{cmd_backup, cmd_list, config_home};

/// Command-line interface definition.
///
/// Parsed using `clap` derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "gitsnap",
    version,
    about = "gitsnap - mirror and archive a GitHub account's repositories",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

/// Available subcommands.
///
/// Each variant corresponds to a subcommand of `gitsnap`.
#[derive(Subcommand, Debug)]
enum Cmd {
    /// Mirror all repositories and write zip archives for changed ones
    Backup,
    /// List the repositories the configured account owns remotely
    List,
    /// Print the gitsnap config directory
    Home,
}

/// CLI entry point.
///
/// Parses arguments with `clap` and executes the selected subcommand.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let cmd = cli.cmd.unwrap();

    match cmd {
        Cmd::Backup => cmd_backup(),
        Cmd::List => cmd_list(),
        Cmd::Home => {
            println!("{}", config_home()?.display());
            Ok(())
        }
    }
}
