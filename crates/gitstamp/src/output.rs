//! Output helpers for the `gitstamp` CLI.

use std::io::{self, Write};

use serde::Serialize;

use crate::context::RuntimeContext;

/// Print `value` as pretty JSON on stdout.
pub fn output_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print a single git value: bare text, or `{"<key>": "<value>"}` in JSON
/// mode.
pub fn output_value(ctx: &RuntimeContext, key: &str, value: &str) {
    if ctx.json {
        let mut obj = serde_json::Map::new();
        obj.insert(key.to_string(), serde_json::Value::from(value));
        output_json(&obj);
    } else {
        let mut handle = io::stdout().lock();
        let _ = writeln!(handle, "{}", value);
    }
}

/// Print a progress/status line unless `--quiet` or `--json` is active.
pub fn status(ctx: &RuntimeContext, message: &str) {
    if !ctx.quiet && !ctx.json {
        println!("{}", message);
    }
}

/// Print a warning to stderr unless `--quiet` is active.
pub fn warn(ctx: &RuntimeContext, message: &str) {
    if !ctx.quiet {
        eprintln!("Warning: {}", message);
    }
}

/// Indent every line of `text` by `width` spaces.
pub fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| format!("{pad}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
