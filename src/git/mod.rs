//! Git transport layer.
//!
//! This module wraps the actual backend implementation (`git2_backend`)
//! and re-exports only the stable public API (`clone_mirror` / `update_mirror`).
//!
//! The idea is to hide internal implementation details (currently based on the
//! `git2` crate) so that future backends or alternative implementations could
//! be swapped in without affecting the rest of the codebase.

mod git2_backend;

/// Clone a remote repository with all branches, and update an existing
/// mirror to the remote default branch tip.
///
/// These are the only public APIs exported from the `git` module.
/// Other modules should use these instead of depending directly on
/// `git2_backend`.
pub use git2_backend::{clone_mirror, update_mirror};
