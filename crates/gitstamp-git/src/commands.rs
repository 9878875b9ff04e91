//! Git command execution.
//!
//! Provides the [`GitRunner`] seam used by the query layer and its
//! process-backed implementation, [`GitCli`], so the rest of the codebase
//! never deals with `std::process::Command` directly.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::debug;

/// Program launched when no override is configured.
pub const DEFAULT_GIT_PROGRAM: &str = "git";

/// How often a child is polled while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when running git commands.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git executable could not be started (missing binary, permission
    /// denied, unusable working directory).
    #[error("failed to launch {program}: {source}")]
    ProcessLaunch {
        /// The program that was launched.
        program: String,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The git command exited with a non-zero status. Only reported when the
    /// runner is in strict mode.
    #[error("git command failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// The trimmed content of stderr.
        stderr: String,
    },

    /// The git command did not finish within the configured timeout and was
    /// killed.
    #[error("git command timed out after {after:?}")]
    Timeout {
        /// The timeout that elapsed.
        after: Duration,
    },

    /// Waiting on an already running git process failed.
    #[error("i/o error while waiting for git: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for git operations.
pub type Result<T> = std::result::Result<T, GitError>;

// ---------------------------------------------------------------------------
// Runner trait
// ---------------------------------------------------------------------------

/// Something that can execute a git invocation and hand back its stdout.
///
/// Implementations return stdout verbatim. Trimming is the caller's job so
/// that fixtures and real processes behave the same way.
pub trait GitRunner {
    /// Run git with `args` and return the captured stdout.
    fn run(&self, args: &[String]) -> Result<String>;
}

impl<R: GitRunner + ?Sized> GitRunner for &R {
    fn run(&self, args: &[String]) -> Result<String> {
        (**self).run(args)
    }
}

// ---------------------------------------------------------------------------
// Process-backed runner
// ---------------------------------------------------------------------------

/// Runs queries by launching the `git` executable.
///
/// By default the exit status and stderr are ignored: whatever git printed
/// on stdout is the result, even when it failed. [`GitCli::strict`] turns a
/// non-zero exit into [`GitError::CommandFailed`].
#[derive(Debug, Clone)]
pub struct GitCli {
    /// Executable to launch, looked up on `PATH`.
    program: String,
    /// Working directory for the child (None = current directory).
    repo_path: Option<PathBuf>,
    /// Whether a non-zero exit status is an error.
    strict: bool,
    /// Kill the child if it runs longer than this.
    timeout: Option<Duration>,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Create a lenient runner for `git` in the current directory.
    pub fn new() -> Self {
        Self {
            program: DEFAULT_GIT_PROGRAM.to_string(),
            repo_path: None,
            strict: false,
            timeout: None,
        }
    }

    /// Launch `program` instead of `git`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Run git inside `path` instead of the current directory.
    pub fn with_repo_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.repo_path = Some(path.into());
        self
    }

    /// Report non-zero exit statuses as [`GitError::CommandFailed`].
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Kill the child and fail with [`GitError::Timeout`] after `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The program this runner launches.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(ref path) = self.repo_path {
            cmd.current_dir(path);
        }
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn launch_error(&self, source: std::io::Error) -> GitError {
        GitError::ProcessLaunch {
            program: self.program.clone(),
            source,
        }
    }

    fn wait_with_timeout(&self, mut child: Child, limit: Duration) -> Result<Output> {
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);
        let deadline = Instant::now() + limit;

        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if Instant::now() >= deadline {
                // Best effort: the child may have exited between the checks.
                let _ = child.kill();
                let _ = child.wait();
                return Err(GitError::Timeout { after: limit });
            }
            thread::sleep(POLL_INTERVAL);
        };

        Ok(Output {
            status,
            stdout: join_reader(stdout),
            stderr: join_reader(stderr),
        })
    }
}

impl GitRunner for GitCli {
    fn run(&self, args: &[String]) -> Result<String> {
        debug!(program = %self.program, ?args, cwd = ?self.repo_path, "running git");

        let mut cmd = self.command(args);
        let output = match self.timeout {
            Some(limit) => {
                let child = cmd.spawn().map_err(|e| self.launch_error(e))?;
                self.wait_with_timeout(child, limit)?
            }
            None => cmd.output().map_err(|e| self.launch_error(e))?,
        };

        debug!(status = ?output.status.code(), bytes = output.stdout.len(), "git finished");

        if self.strict && !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(GitError::CommandFailed {
                code: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Drain a pipe on a helper thread so a chatty child cannot block on a full
/// pipe while we poll it.
fn spawn_reader<P: Read + Send + 'static>(mut pipe: P) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .map(|h| h.join().unwrap_or_default())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
