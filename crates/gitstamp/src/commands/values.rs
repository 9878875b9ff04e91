//! `gitstamp branch`, `gitstamp hash`, `gitstamp short-hash` -- print one
//! git value.

use anyhow::{Context, Result};
use gitstamp_git::query;

use crate::context::RuntimeContext;
use crate::output::output_value;

/// Execute the `gitstamp branch` command.
pub fn run_branch(ctx: &RuntimeContext) -> Result<()> {
    let branch = query::branch_name(&ctx.runner()).context("failed to read branch name")?;
    output_value(ctx, "branch_name", &branch);
    Ok(())
}

/// Execute the `gitstamp hash` command.
pub fn run_hash(ctx: &RuntimeContext) -> Result<()> {
    let hash = query::commit_hash(&ctx.runner()).context("failed to read commit hash")?;
    output_value(ctx, "commit_hash", &hash);
    Ok(())
}

/// Execute the `gitstamp short-hash` command.
pub fn run_short_hash(ctx: &RuntimeContext) -> Result<()> {
    let hash =
        query::short_commit_hash(&ctx.runner()).context("failed to read short commit hash")?;
    output_value(ctx, "short_commit_hash", &hash);
    Ok(())
}
