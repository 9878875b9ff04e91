//! `gitstamp version` -- print the gitstamp version and the git it drives.

use anyhow::Result;
use gitstamp_git::GitRunner;
use tracing::debug;

use crate::context::RuntimeContext;
use crate::output::output_json;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Execute the `gitstamp version` command.
///
/// A git that cannot be run is reported, not treated as an error, so the
/// command doubles as a quick check of the `--git` setting.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let runner = ctx.runner();
    let git_version = git_version(&runner);

    if ctx.json {
        output_json(&serde_json::json!({
            "version": VERSION,
            "git_program": runner.program(),
            "git_version": git_version,
        }));
    } else {
        println!("gitstamp version {}", VERSION);
        println!(
            "{}: {}",
            runner.program(),
            git_version.as_deref().unwrap_or("not available")
        );
    }
    Ok(())
}

/// The first line `git --version` prints, if git could be run at all.
fn git_version(runner: &impl GitRunner) -> Option<String> {
    match runner.run(&["--version".to_string()]) {
        Ok(out) => out
            .lines()
            .next()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string),
        Err(e) => {
            debug!(error = %e, "git --version failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitstamp_git::GitError;

    struct Prints(&'static str);

    impl GitRunner for Prints {
        fn run(&self, args: &[String]) -> gitstamp_git::Result<String> {
            assert_eq!(args, ["--version"]);
            Ok(self.0.to_string())
        }
    }

    struct Missing;

    impl GitRunner for Missing {
        fn run(&self, _args: &[String]) -> gitstamp_git::Result<String> {
            Err(GitError::ProcessLaunch {
                program: "git".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    #[test]
    fn reports_first_line() {
        assert_eq!(
            git_version(&Prints("git version 2.43.0\r\n")).as_deref(),
            Some("git version 2.43.0")
        );
    }

    #[test]
    fn empty_output_is_unknown() {
        assert_eq!(git_version(&Prints("")), None);
    }

    #[test]
    fn launch_failure_is_unknown() {
        assert_eq!(git_version(&Missing), None);
    }
}
