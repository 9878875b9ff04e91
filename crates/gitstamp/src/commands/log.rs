//! `gitstamp log` -- print the formatted commit log.

use anyhow::{Context, Result};
use gitstamp_git::query;

use crate::cli::LogArgs;
use crate::context::RuntimeContext;
use crate::output::output_value;

/// Execute the `gitstamp log` command.
pub fn run(ctx: &RuntimeContext, args: &LogArgs) -> Result<()> {
    let options = ctx.log_options(&args.log);
    let log = query::commit_log(&ctx.runner(), &options).context("failed to read commit log")?;
    output_value(ctx, "commit_log", &log);
    Ok(())
}
