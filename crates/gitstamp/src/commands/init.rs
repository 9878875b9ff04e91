//! `gitstamp init` -- write a starter `.gitstamp.yaml`.
//!
//! The file goes to the root of the enclosing git working tree, or the
//! current directory when there is none.

use std::env;

use anyhow::{Context, Result, bail};
use gitstamp_config::config::{CONFIG_FILE_NAME, StampConfig, save_config};
use gitstamp_git::gitdir::find_git_root;

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::{output_json, status};

/// Execute the `gitstamp init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let cwd = env::current_dir().context("failed to get current directory")?;
    let start = ctx.repo_dir().unwrap_or(cwd);
    let dir = find_git_root(&start).unwrap_or(start);

    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !args.force {
        bail!(
            "{} already exists\n\nUse --force to overwrite it.",
            path.display()
        );
    }

    let written = save_config(&dir, &StampConfig::starter())
        .with_context(|| format!("failed to write {}", path.display()))?;

    if ctx.json {
        output_json(&serde_json::json!({ "config": written }));
    } else {
        status(ctx, &format!("Created {}", written.display()));
    }
    Ok(())
}
