//! The four fixed git queries gitstamp runs.
//!
//! Every query is read-only. [`GitQuery::args`] produces the argument vector
//! handed to the process (no shell involved), and [`GitQuery::command_line`]
//! renders the same invocation the way a user would type it.

use std::fmt;
use std::num::NonZeroU32;

use crate::commands::{GitRunner, Result};

/// Options for the commit log query.
///
/// `format` is a git pretty-format string such as `"%h %cd %cn %s"`. It is
/// passed to git as a single argument, so it needs no shell quoting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitLogOptions {
    /// Number of log entries to retrieve.
    pub count: NonZeroU32,
    /// Leave merge commits out of the log.
    pub exclude_merges: bool,
    /// Pretty-format string.
    pub format: String,
}

impl CommitLogOptions {
    pub fn new(count: NonZeroU32, exclude_merges: bool, format: impl Into<String>) -> Self {
        Self {
            count,
            exclude_merges,
            format: format.into(),
        }
    }
}

/// One of the query shapes gitstamp sends to git.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitQuery<'a> {
    /// `symbolic-ref --short HEAD`
    BranchName,
    /// `rev-parse HEAD`
    CommitHash,
    /// `rev-parse --short HEAD`
    ShortCommitHash,
    /// `log -n <count> --date=short [--no-merges] --pretty=format:<format>`
    CommitLog(&'a CommitLogOptions),
}

impl GitQuery<'_> {
    /// Argument vector passed to the git process.
    pub fn args(&self) -> Vec<String> {
        let fixed: &[&str] = match self {
            Self::BranchName => &["symbolic-ref", "--short", "HEAD"],
            Self::CommitHash => &["rev-parse", "HEAD"],
            Self::ShortCommitHash => &["rev-parse", "--short", "HEAD"],
            Self::CommitLog(opts) => {
                let mut args = vec![
                    "log".to_string(),
                    "-n".to_string(),
                    opts.count.to_string(),
                    "--date=short".to_string(),
                ];
                if opts.exclude_merges {
                    args.push("--no-merges".to_string());
                }
                args.push(format!("--pretty=format:{}", opts.format));
                return args;
            }
        };
        fixed.iter().map(|s| (*s).to_string()).collect()
    }

    /// The invocation as a single line, with the log format in double
    /// quotes. Used for logging and display only.
    pub fn command_line(&self) -> String {
        match self {
            Self::CommitLog(opts) => {
                let no_merges = if opts.exclude_merges {
                    "--no-merges "
                } else {
                    ""
                };
                format!(
                    "log -n {} --date=short {}--pretty=format:\"{}\"",
                    opts.count, no_merges, opts.format
                )
            }
            _ => self.args().join(" "),
        }
    }

    /// Run the query and return its stdout with surrounding whitespace
    /// (including git's trailing newline) removed.
    pub fn run<R: GitRunner + ?Sized>(&self, runner: &R) -> Result<String> {
        tracing::debug!(query = %self, "resolving git value");
        let raw = runner.run(&self.args())?;
        Ok(raw.trim().to_string())
    }
}

impl fmt::Display for GitQuery<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Current branch short name.
///
/// On a detached HEAD git prints nothing on stdout, so the result is empty
/// unless the runner is strict.
pub fn branch_name<R: GitRunner + ?Sized>(runner: &R) -> Result<String> {
    GitQuery::BranchName.run(runner)
}

/// Full hash of HEAD.
pub fn commit_hash<R: GitRunner + ?Sized>(runner: &R) -> Result<String> {
    GitQuery::CommitHash.run(runner)
}

/// Abbreviated hash of HEAD.
pub fn short_commit_hash<R: GitRunner + ?Sized>(runner: &R) -> Result<String> {
    GitQuery::ShortCommitHash.run(runner)
}

/// Formatted commit log, one line per entry.
pub fn commit_log<R: GitRunner + ?Sized>(runner: &R, options: &CommitLogOptions) -> Result<String> {
    GitQuery::CommitLog(options).run(runner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Returns a canned stdout and records what it was asked to run.
    struct Fixture {
        stdout: &'static str,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl Fixture {
        fn new(stdout: &'static str) -> Self {
            Self {
                stdout,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl GitRunner for Fixture {
        fn run(&self, args: &[String]) -> Result<String> {
            self.calls.borrow_mut().push(args.to_vec());
            Ok(self.stdout.to_string())
        }
    }

    fn opts(count: u32, exclude_merges: bool, format: &str) -> CommitLogOptions {
        CommitLogOptions::new(NonZeroU32::new(count).unwrap(), exclude_merges, format)
    }

    #[test]
    fn log_command_line_with_no_merges() {
        let o = opts(5, true, "%h");
        assert_eq!(
            GitQuery::CommitLog(&o).command_line(),
            r#"log -n 5 --date=short --no-merges --pretty=format:"%h""#
        );
    }

    #[test]
    fn log_command_line_without_no_merges() {
        let o = opts(5, false, "%h");
        assert_eq!(
            GitQuery::CommitLog(&o).command_line(),
            r#"log -n 5 --date=short --pretty=format:"%h""#
        );
    }

    #[test]
    fn log_args_are_unquoted() {
        let o = opts(10, true, "%h %cd %cn %s");
        assert_eq!(
            GitQuery::CommitLog(&o).args(),
            vec![
                "log",
                "-n",
                "10",
                "--date=short",
                "--no-merges",
                "--pretty=format:%h %cd %cn %s",
            ]
        );
    }

    #[test]
    fn fixed_query_shapes() {
        assert_eq!(
            GitQuery::BranchName.command_line(),
            "symbolic-ref --short HEAD"
        );
        assert_eq!(GitQuery::CommitHash.command_line(), "rev-parse HEAD");
        assert_eq!(
            GitQuery::ShortCommitHash.command_line(),
            "rev-parse --short HEAD"
        );
    }

    #[test]
    fn display_matches_command_line() {
        assert_eq!(GitQuery::CommitHash.to_string(), "rev-parse HEAD");
    }

    #[test]
    fn trims_trailing_newline() {
        assert_eq!(branch_name(&Fixture::new("main\n")).unwrap(), "main");
        assert_eq!(branch_name(&Fixture::new("main\r\n")).unwrap(), "main");
    }

    #[test]
    fn log_keeps_inner_lines() {
        let fixture = Fixture::new("\na1 2024-01-02 bob fix\nb2 2024-01-01 amy init\n");
        let log = commit_log(&fixture, &opts(2, false, "%h %cd %cn %s")).unwrap();
        assert_eq!(log, "a1 2024-01-02 bob fix\nb2 2024-01-01 amy init");
    }

    #[test]
    fn each_helper_sends_its_own_query() {
        let fixture = Fixture::new("x");
        branch_name(&fixture).unwrap();
        commit_hash(&fixture).unwrap();
        short_commit_hash(&fixture).unwrap();

        let calls = fixture.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0], GitQuery::BranchName.args());
        assert_eq!(calls[1], GitQuery::CommitHash.args());
        assert_eq!(calls[2], GitQuery::ShortCommitHash.args());
    }
}
