//! Resolved git values that fill a template.

use gitstamp_git::query::{self, CommitLogOptions};
use gitstamp_git::{GitRunner, Result};
use serde::Serialize;

use crate::token::Token;

/// The four values substituted into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateValues {
    pub branch_name: String,
    pub commit_hash: String,
    pub short_commit_hash: String,
    pub commit_log: String,
}

impl TemplateValues {
    /// Ask `runner` for each value, one git invocation at a time, in the
    /// order branch, hash, short hash, log.
    ///
    /// Stops at the first error, so a missing git binary fails before any
    /// later query is attempted.
    pub fn resolve<R: GitRunner + ?Sized>(runner: &R, log: &CommitLogOptions) -> Result<Self> {
        Ok(Self {
            branch_name: query::branch_name(runner)?,
            commit_hash: query::commit_hash(runner)?,
            short_commit_hash: query::short_commit_hash(runner)?,
            commit_log: query::commit_log(runner, log)?,
        })
    }

    /// The value that replaces `token`.
    pub fn get(&self, token: Token) -> &str {
        match token {
            Token::BranchName => &self.branch_name,
            Token::CommitHash => &self.commit_hash,
            Token::ShortCommitHash => &self.short_commit_hash,
            Token::CommitLog => &self.commit_log,
        }
    }
}
