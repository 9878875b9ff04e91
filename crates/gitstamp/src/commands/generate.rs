//! `gitstamp generate` -- render templates with git values.
//!
//! With `--template` or `--template-text` a single template is rendered to
//! `--output`. Without them every target in the configuration is rendered.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use gitstamp_config::config::CONFIG_FILE_NAME;

use crate::cli::GenerateArgs;
use crate::context::RuntimeContext;
use crate::output::{self, output_json, status};

/// Execute the `gitstamp generate` command.
pub fn run(ctx: &RuntimeContext, args: &GenerateArgs) -> Result<()> {
    if args.template.is_some() || args.template_text.is_some() {
        return run_single(ctx, args);
    }
    if args.output.is_some() {
        bail!("--output needs a template: pass --template <FILE> or --template-text <TEXT>");
    }
    run_targets(ctx, args)
}

/// Render the template given on the command line.
fn run_single(ctx: &RuntimeContext, args: &GenerateArgs) -> Result<()> {
    let template = match &args.template {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read template {}", path.display()))?,
        None => args.template_text.clone().unwrap_or_default(),
    };

    let log = ctx.log_options(&args.log);
    let generator = ctx.generator(log);

    if args.stdout {
        let rendered = generator.render_to_string(&template, None)?;
        print!("{}", rendered);
        return Ok(());
    }

    let Some(output) = args.output.clone() else {
        bail!("--output is required unless --stdout is given");
    };
    generator
        .render(&output, &template, None)
        .with_context(|| format!("failed to generate {}", output.display()))?;

    report(ctx, &[output]);
    Ok(())
}

/// Render every configured target.
fn run_targets(ctx: &RuntimeContext, args: &GenerateArgs) -> Result<()> {
    let targets = &ctx.config.targets;
    if targets.is_empty() {
        output::warn(
            ctx,
            &format!(
                "no generation targets configured; add 'targets' to {} or pass --template",
                CONFIG_FILE_NAME
            ),
        );
        if ctx.json {
            output_json(&serde_json::json!({ "written": [] }));
        }
        return Ok(());
    }

    let mut written = Vec::with_capacity(targets.len());
    let result = render_targets(ctx, args, &mut written);

    // Files written before a failure are still on disk.
    if !args.stdout {
        report(ctx, &written);
    }
    result
}

/// Render each target in order, recording every file written. Stops at the
/// first failure.
fn render_targets(
    ctx: &RuntimeContext,
    args: &GenerateArgs,
    written: &mut Vec<PathBuf>,
) -> Result<()> {
    let targets = &ctx.config.targets;
    let generator = ctx.generator(ctx.log_options(&args.log));
    let cli_log = args.log.to_override();
    let labelled = targets.len() > 1;

    for (index, target) in targets.iter().enumerate() {
        let template = target.source(ctx.base_dir())?.read()?;
        let log = cli_log
            .apply(&target.log.apply(&ctx.config.log))
            .to_options();
        let output = target.output_path(ctx.base_dir());

        if args.stdout {
            let rendered = generator.render_to_string(&template, Some(&log))?;
            if labelled {
                if index > 0 {
                    println!();
                }
                println!("==> {} <==", output.display());
            }
            print!("{}", rendered);
            if labelled && !rendered.ends_with('\n') {
                println!();
            }
            continue;
        }

        generator
            .render(&output, &template, Some(&log))
            .with_context(|| format!("failed to generate {}", output.display()))?;
        written.push(output);
    }
    Ok(())
}

fn report(ctx: &RuntimeContext, written: &[PathBuf]) {
    if ctx.json {
        output_json(&serde_json::json!({ "written": written }));
        return;
    }
    for path in written {
        status(ctx, &format!("Generated {}", path.display()));
    }
}
