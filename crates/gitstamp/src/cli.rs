//! Clap CLI definitions for the `gitstamp` command.

use std::num::NonZeroU32;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gitstamp_config::config::LogOverride;

/// gitstamp -- stamp git information into generated files.
///
/// Reads the current branch, commit hash and commit log from `git` and
/// substitutes them for `#BRANCH_NAME#`, `#COMMIT_HASH#`,
/// `#SHORT_COMMIT_HASH#` and `#COMMIT_LOG#` in a template.
#[derive(Parser, Debug)]
#[command(
    name = "gitstamp",
    about = "Stamp git branch, commit hash and commit log into generated files",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Run git in this directory instead of the current one.
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub repo: Option<PathBuf>,

    /// Configuration file (default: $GITSTAMP_CONFIG, then the nearest .gitstamp.yaml).
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Git executable to launch.
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub git: Option<String>,

    /// Fail when git exits with a non-zero status instead of using its output.
    #[arg(long, global = true)]
    pub strict: bool,

    /// Kill git if a single query takes longer than this many seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<NonZeroU32>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a template, or every configured target, with git values.
    #[command(alias = "gen")]
    Generate(GenerateArgs),

    /// Print the current branch name.
    Branch,

    /// Print the full commit hash of HEAD.
    Hash,

    /// Print the abbreviated commit hash of HEAD.
    ShortHash,

    /// Print the formatted commit log.
    Log(LogArgs),

    /// Print every value available to templates.
    Info(InfoArgs),

    /// Write a starter .gitstamp.yaml.
    Init(InitArgs),

    /// Print version information.
    Version,

    /// Generate shell completion scripts.
    Completion(CompletionArgs),
}

/// Commit log options shared by several subcommands. Unset flags fall back
/// to the configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct LogOptionArgs {
    /// Number of log entries.
    #[arg(short = 'n', long, value_name = "N")]
    pub count: Option<NonZeroU32>,

    /// Leave merge commits out of the log.
    #[arg(long, overrides_with = "merges")]
    pub no_merges: bool,

    /// Keep merge commits in the log, even when the configuration leaves
    /// them out.
    #[arg(long, overrides_with = "no_merges")]
    pub merges: bool,

    /// Git pretty-format string, e.g. "%h %cd %cn %s".
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

impl LogOptionArgs {
    /// The flags as overrides for the configured log options.
    pub fn to_override(&self) -> LogOverride {
        LogOverride {
            count: self.count,
            no_merges: match (self.no_merges, self.merges) {
                (true, _) => Some(true),
                (false, true) => Some(false),
                (false, false) => None,
            },
            format: self.format.clone(),
        }
    }
}

/// Arguments for `gitstamp generate`.
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// File to write. Without --template/--template-text, every configured
    /// target is rendered instead.
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Template file.
    #[arg(short, long, value_name = "FILE", conflicts_with = "template_text")]
    pub template: Option<PathBuf>,

    /// Inline template text.
    #[arg(long, value_name = "TEXT")]
    pub template_text: Option<String>,

    /// Print the rendered text instead of writing files.
    #[arg(long)]
    pub stdout: bool,

    #[command(flatten)]
    pub log: LogOptionArgs,
}

/// Arguments for `gitstamp log`.
#[derive(Args, Debug)]
pub struct LogArgs {
    #[command(flatten)]
    pub log: LogOptionArgs,
}

/// Arguments for `gitstamp info`.
#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub log: LogOptionArgs,
}

/// Arguments for `gitstamp init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing .gitstamp.yaml.
    #[arg(long)]
    pub force: bool,
}

/// Arguments for `gitstamp completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    #[command(subcommand)]
    pub command: CompletionCommands,
}

/// Completion subcommands.
#[derive(Subcommand, Debug)]
pub enum CompletionCommands {
    /// Generate Bash completions.
    Bash,
    /// Generate Zsh completions.
    Zsh,
    /// Generate Fish completions.
    Fish,
    /// Generate PowerShell completions.
    Powershell,
}
