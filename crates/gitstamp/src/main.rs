//! `gitstamp` -- stamp git information into generated files.
//!
//! Parses CLI arguments with clap, sets up logging, resolves the runtime
//! context and dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, GlobalArgs};
use context::RuntimeContext;

/// Crates whose debug output `--verbose` turns on.
const VERBOSE_FILTER: &str =
    "gitstamp=debug,gitstamp_core=debug,gitstamp_git=debug,gitstamp_config=debug";

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging(&cli.global);

    let result = match cli.command {
        Some(command) => dispatch(&cli.global, command),
        None => {
            // No subcommand -- print help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    // Handle errors: print message and exit with code 1
    if let Err(e) = result {
        // For JSON mode, output error as JSON
        if cli.global.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

/// Run `command`. Most commands load the configuration first; `init` and
/// `version` must work when it is missing or broken, and completions need
/// no context at all.
fn dispatch(global: &GlobalArgs, command: Commands) -> anyhow::Result<()> {
    let loaded = || RuntimeContext::from_global_args(global);
    match command {
        Commands::Generate(args) => commands::generate::run(&loaded()?, &args),
        Commands::Branch => commands::values::run_branch(&loaded()?),
        Commands::Hash => commands::values::run_hash(&loaded()?),
        Commands::ShortHash => commands::values::run_short_hash(&loaded()?),
        Commands::Log(args) => commands::log::run(&loaded()?, &args),
        Commands::Info(args) => commands::info::run(&loaded()?, &args),
        Commands::Init(args) => {
            commands::init::run(&RuntimeContext::without_config(global), &args)
        }
        Commands::Version => commands::version::run(&RuntimeContext::without_config(global)),
        Commands::Completion(args) => commands::completion::run(&args),
    }
}

/// `--verbose` enables debug output for the gitstamp crates; otherwise
/// `RUST_LOG` is honoured when set. Logs always go to stderr.
fn init_logging(global: &GlobalArgs) {
    let filter = if global.verbose {
        Some(EnvFilter::new(VERBOSE_FILTER))
    } else if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        Some(EnvFilter::from_default_env())
    } else {
        None
    };

    if let Some(filter) = filter {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
