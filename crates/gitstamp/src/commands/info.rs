//! `gitstamp info` -- print every value available to templates.

use anyhow::{Context, Result};
use gitstamp_core::{TemplateValues, Token};

use crate::cli::InfoArgs;
use crate::context::RuntimeContext;
use crate::output::{indent, output_json};

/// Execute the `gitstamp info` command.
pub fn run(ctx: &RuntimeContext, args: &InfoArgs) -> Result<()> {
    let options = ctx.log_options(&args.log);
    let values =
        TemplateValues::resolve(&ctx.runner(), &options).context("failed to read git values")?;

    if ctx.json {
        output_json(&values);
        return Ok(());
    }

    for token in [Token::BranchName, Token::CommitHash, Token::ShortCommitHash] {
        println!("{:<22}{}", token.as_str(), values.get(token));
    }
    println!("{}", Token::CommitLog.as_str());
    if !values.commit_log.is_empty() {
        println!("{}", indent(&values.commit_log, 2));
    }
    if let Some(ref path) = ctx.config_path {
        if !ctx.quiet {
            println!();
            println!("config: {}", path.display());
        }
    }
    Ok(())
}
