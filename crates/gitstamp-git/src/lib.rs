//! Git integration for gitstamp.
//!
//! This crate knows how to launch the `git` executable and how to build the
//! four read-only queries gitstamp needs: branch name, full and short commit
//! hash, and a formatted commit log.

pub mod commands;
pub mod gitdir;
pub mod query;

pub use commands::{GitCli, GitError, GitRunner, Result};
pub use query::{CommitLogOptions, GitQuery};
