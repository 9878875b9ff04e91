//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds everything a command handler needs: global
//! flags and the loaded configuration with command-line overrides applied.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gitstamp_config::config::{StampConfig, load_config};
use gitstamp_config::config_file::find_config_file;
use gitstamp_core::Generator;
use gitstamp_git::{CommitLogOptions, GitCli};
use tracing::{debug, info};

use crate::cli::{GlobalArgs, LogOptionArgs};

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Configuration file in use, if one was found.
    pub config_path: Option<PathBuf>,

    /// Loaded configuration with command-line overrides applied.
    pub config: StampConfig,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// The configuration file is `--config`, else `$GITSTAMP_CONFIG`, else
    /// the nearest `.gitstamp.yaml` above the repository directory.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let cwd = env::current_dir().context("failed to get current directory")?;
        let repo = global.repo.as_ref().map(|p| cwd.join(p));

        let config_path = match &global.config {
            Some(path) => Some(cwd.join(path)),
            None => find_config_file(repo.as_deref().unwrap_or(cwd.as_path())),
        };
        debug!(?config_path, "resolved configuration file");

        let config = load_config(config_path.as_deref()).with_context(|| match &config_path {
            Some(path) => format!("failed to load configuration from {}", path.display()),
            None => "failed to load configuration".to_string(),
        })?;

        let mut ctx = Self::with_config(global, config);
        ctx.config_path = config_path;
        if let Some(repo) = repo {
            ctx.config.repo = Some(repo);
        }
        Ok(ctx)
    }

    /// Build a context without reading any configuration file. Used by
    /// commands that must work even when the existing file is broken.
    pub fn without_config(global: &GlobalArgs) -> Self {
        let config = StampConfig {
            repo: global.repo.clone(),
            ..StampConfig::default()
        };
        Self::with_config(global, config)
    }

    fn with_config(global: &GlobalArgs, mut config: StampConfig) -> Self {
        if let Some(ref program) = global.git {
            config.git.program = program.clone();
        }
        if global.strict {
            config.git.strict = true;
        }
        if let Some(secs) = global.timeout {
            config.git.timeout_secs = Some(u64::from(secs.get()));
        }

        Self {
            config_path: None,
            config,
            json: global.json,
            quiet: global.quiet,
        }
    }

    /// Directory git runs in, if not the current one.
    pub fn repo_dir(&self) -> Option<PathBuf> {
        self.config
            .repo
            .as_ref()
            .map(|repo| self.config.base_dir.join(repo))
    }

    /// A git runner honouring the configured program, directory, strictness
    /// and timeout.
    pub fn runner(&self) -> GitCli {
        let runner = GitCli::new()
            .with_program(self.config.git.program.clone())
            .strict(self.config.git.strict)
            .with_timeout(self.config.git.timeout());
        match self.repo_dir() {
            Some(dir) => runner.with_repo_path(dir),
            None => runner,
        }
    }

    /// Configured log options with the command-line flags layered on top.
    pub fn log_options(&self, args: &LogOptionArgs) -> CommitLogOptions {
        args.to_override().apply(&self.config.log).to_options()
    }

    /// A generator whose written-file hook reports each file.
    pub fn generator(&self, default_log: CommitLogOptions) -> Generator<GitCli> {
        Generator::new(self.runner(), default_log).on_written(report_written)
    }

    /// Directory that relative target paths are resolved against.
    pub fn base_dir(&self) -> &Path {
        &self.config.base_dir
    }
}

fn report_written(path: &Path) {
    info!(path = %path.display(), "generated file changed");
}
