//! End-to-end CLI integration tests for the `gitstamp` binary.
//!
//! Each test builds a throwaway git repository in a temporary directory and
//! runs the binary against it via `assert_cmd`. Requires `git` on `PATH`.

use std::path::Path;
use std::process;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a `Command` targeting the cargo-built `gitstamp` binary, with any
/// inherited gitstamp settings cleared.
fn gitstamp(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gitstamp").unwrap();
    cmd.current_dir(dir)
        .env_remove("GITSTAMP_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Run git in `dir` with a fixed identity, panicking on failure.
fn git(dir: &Path, args: &[&str]) -> String {
    let output = process::Command::new("git")
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .env("GIT_AUTHOR_NAME", "Test Author")
        .env("GIT_AUTHOR_EMAIL", "author@example.com")
        .env("GIT_COMMITTER_NAME", "Test Committer")
        .env("GIT_COMMITTER_EMAIL", "committer@example.com")
        .output()
        .expect("git should be installed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

/// A repository on branch `main` with two commits.
fn init_repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    git(tmp.path(), &["init", "-q"]);
    git(tmp.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(tmp.path(), &["commit", "-q", "--allow-empty", "-m", "first commit"]);
    git(tmp.path(), &["commit", "-q", "--allow-empty", "-m", "second commit"]);
    tmp
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "gitstamp failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap()
}

// ---------------------------------------------------------------------------
// Value commands
// ---------------------------------------------------------------------------

#[test]
fn branch_prints_current_branch() {
    let repo = init_repo();
    gitstamp(repo.path())
        .arg("branch")
        .assert()
        .success()
        .stdout("main\n");
}

#[test]
fn hash_matches_git() {
    let repo = init_repo();
    let expected = git(repo.path(), &["rev-parse", "HEAD"]);

    let out = stdout_of(gitstamp(repo.path()).arg("hash"));
    assert_eq!(out.trim(), expected);
    assert_eq!(expected.len(), 40);
}

#[test]
fn short_hash_is_prefix_of_hash() {
    let repo = init_repo();
    let full = git(repo.path(), &["rev-parse", "HEAD"]);

    let short = stdout_of(gitstamp(repo.path()).arg("short-hash"));
    let short = short.trim();
    assert!(!short.is_empty());
    assert!(full.starts_with(short), "{short} is not a prefix of {full}");
}

#[test]
fn log_respects_count_and_format() {
    let repo = init_repo();
    gitstamp(repo.path())
        .args(["log", "--count", "1", "--format", "%s"])
        .assert()
        .success()
        .stdout("second commit\n");

    gitstamp(repo.path())
        .args(["log", "-n", "5", "--format", "%s by %cn"])
        .assert()
        .success()
        .stdout("second commit by Test Committer\nfirst commit by Test Committer\n");
}

#[test]
fn log_no_merges_skips_merge_commits() {
    let repo = init_repo();
    git(repo.path(), &["checkout", "-q", "-b", "topic"]);
    git(repo.path(), &["commit", "-q", "--allow-empty", "-m", "topic work"]);
    git(repo.path(), &["checkout", "-q", "main"]);
    git(repo.path(), &["commit", "-q", "--allow-empty", "-m", "main work"]);
    git(repo.path(), &["merge", "-q", "--no-ff", "-m", "merge topic", "topic"]);

    let with_merges = stdout_of(gitstamp(repo.path()).args(["log", "--format", "%s"]));
    assert!(with_merges.contains("merge topic"));

    let without = stdout_of(gitstamp(repo.path()).args(["log", "--format", "%s", "--no-merges"]));
    assert!(!without.contains("merge topic"));
    assert!(without.contains("topic work"));
}

#[test]
fn repo_flag_selects_directory() {
    let repo = init_repo();
    let elsewhere = TempDir::new().unwrap();
    gitstamp(elsewhere.path())
        .arg("-C")
        .arg(repo.path())
        .arg("branch")
        .assert()
        .success()
        .stdout("main\n");
}

#[test]
fn info_json_has_all_values() {
    let repo = init_repo();
    let out = stdout_of(gitstamp(repo.path()).args(["--json", "info", "--format", "%s"]));
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(json["branch_name"], "main");
    assert_eq!(
        json["commit_hash"].as_str().unwrap(),
        git(repo.path(), &["rev-parse", "HEAD"])
    );
    assert!(json["short_commit_hash"].is_string());
    assert_eq!(json["commit_log"], "second commit\nfirst commit");
}

#[test]
fn value_json_output() {
    let repo = init_repo();
    let out = stdout_of(gitstamp(repo.path()).args(["branch", "--json"]));
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["branch_name"], "main");
}

// ---------------------------------------------------------------------------
// Lenient vs strict git failures
// ---------------------------------------------------------------------------

#[test]
fn detached_head_branch_is_empty_when_lenient() {
    let repo = init_repo();
    git(repo.path(), &["checkout", "-q", "--detach"]);

    gitstamp(repo.path())
        .arg("branch")
        .assert()
        .success()
        .stdout("\n");
}

#[test]
fn detached_head_branch_fails_when_strict() {
    let repo = init_repo();
    git(repo.path(), &["checkout", "-q", "--detach"]);

    gitstamp(repo.path())
        .args(["--strict", "branch"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("git command failed"));
}

#[test]
fn missing_git_binary_fails() {
    let repo = init_repo();
    gitstamp(repo.path())
        .args(["--git", "gitstamp-no-such-git", "hash"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to launch gitstamp-no-such-git"));
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[test]
fn generate_inline_template_creates_directories() {
    let repo = init_repo();
    let hash = git(repo.path(), &["rev-parse", "HEAD"]);

    gitstamp(repo.path())
        .args([
            "generate",
            "--output",
            "gen/deep/info.txt",
            "--template-text",
            "branch=#BRANCH_NAME# hash=#COMMIT_HASH#",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated"));

    let written = std::fs::read_to_string(repo.path().join("gen/deep/info.txt")).unwrap();
    assert_eq!(written, format!("branch=main hash={hash}"));
}

#[test]
fn generate_template_file() {
    let repo = init_repo();
    std::fs::write(
        repo.path().join("info.tmpl"),
        "#SHORT_COMMIT_HASH#\n#COMMIT_LOG#\n",
    )
    .unwrap();
    let short = git(repo.path(), &["rev-parse", "--short", "HEAD"]);

    gitstamp(repo.path())
        .args([
            "generate", "-o", "info.txt", "-t", "info.tmpl", "-n", "1", "--format", "%s",
        ])
        .assert()
        .success();

    let written = std::fs::read_to_string(repo.path().join("info.txt")).unwrap();
    assert_eq!(written, format!("{short}\nsecond commit\n"));
}

#[test]
fn generate_stdout_writes_nothing() {
    let repo = init_repo();
    gitstamp(repo.path())
        .args(["generate", "--stdout", "--template-text", "on #BRANCH_NAME#"])
        .assert()
        .success()
        .stdout("on main");

    let entries: Vec<_> = std::fs::read_dir(repo.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from(".git")]);
}

#[test]
fn generate_launch_failure_writes_nothing() {
    let repo = init_repo();
    gitstamp(repo.path())
        .args([
            "--git",
            "gitstamp-no-such-git",
            "generate",
            "--output",
            "gen/info.txt",
            "--template-text",
            "#COMMIT_HASH#",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to launch"));

    assert!(!repo.path().join("gen").exists());
}

#[test]
fn generate_output_without_template_fails() {
    let repo = init_repo();
    gitstamp(repo.path())
        .args(["generate", "--output", "x.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output needs a template"));
}

#[test]
fn generate_without_targets_warns() {
    let repo = init_repo();
    gitstamp(repo.path())
        .arg("generate")
        .assert()
        .success()
        .stderr(predicate::str::contains("no generation targets configured"));
}

#[test]
fn generate_configured_targets() {
    let repo = init_repo();
    std::fs::create_dir(repo.path().join("templates")).unwrap();
    std::fs::write(
        repo.path().join("templates/branch.tmpl"),
        "branch: #BRANCH_NAME#",
    )
    .unwrap();
    std::fs::write(
        repo.path().join(".gitstamp.yaml"),
        "log:\n  format: \"%s\"\n\
         targets:\n\
         \x20 - output: out/branch.txt\n\
         \x20   template: templates/branch.tmpl\n\
         \x20 - output: out/log.txt\n\
         \x20   template_text: \"#COMMIT_LOG#\"\n\
         \x20   log:\n\
         \x20     count: 1\n",
    )
    .unwrap();

    // Run from a subdirectory: the config is discovered upwards and paths
    // resolve against its directory.
    let sub = repo.path().join("src");
    std::fs::create_dir(&sub).unwrap();
    let out = stdout_of(gitstamp(&sub).args(["--json", "generate"]));
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["written"].as_array().unwrap().len(), 2);

    assert_eq!(
        std::fs::read_to_string(repo.path().join("out/branch.txt")).unwrap(),
        "branch: main"
    );
    assert_eq!(
        std::fs::read_to_string(repo.path().join("out/log.txt")).unwrap(),
        "second commit"
    );
}

#[test]
fn generate_stdout_labels_each_target() {
    let repo = init_repo();
    std::fs::write(
        repo.path().join(".gitstamp.yaml"),
        "targets:\n\
         \x20 - output: a.txt\n\
         \x20   template_text: \"#BRANCH_NAME#\"\n\
         \x20 - output: b.txt\n\
         \x20   template_text: \"#BRANCH_NAME#\"\n",
    )
    .unwrap();

    let out = stdout_of(gitstamp(repo.path()).args(["generate", "--stdout"]));
    let root = repo.path().canonicalize().unwrap();
    let a = root.join("a.txt");
    let b = root.join("b.txt");
    assert_eq!(
        out,
        format!("==> {} <==\nmain\n\n==> {} <==\nmain\n", a.display(), b.display())
    );
    assert!(!a.exists());
    assert!(!b.exists());
}

#[test]
fn generate_reports_files_written_before_failure() {
    let repo = init_repo();
    std::fs::write(
        repo.path().join(".gitstamp.yaml"),
        "targets:\n\
         \x20 - output: first.txt\n\
         \x20   template_text: \"#BRANCH_NAME#\"\n\
         \x20 - output: second.txt\n\
         \x20   template: missing.tmpl\n",
    )
    .unwrap();

    gitstamp(repo.path())
        .arg("generate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Generated").and(predicate::str::contains("first.txt")))
        .stderr(predicate::str::contains("missing.tmpl"));
    assert_eq!(
        std::fs::read_to_string(repo.path().join("first.txt")).unwrap(),
        "main"
    );
    assert!(!repo.path().join("second.txt").exists());
}

#[test]
fn merges_flag_overrides_configured_no_merges() {
    let repo = init_repo();
    git(repo.path(), &["checkout", "-q", "-b", "side"]);
    git(repo.path(), &["commit", "-q", "--allow-empty", "-m", "side commit"]);
    git(repo.path(), &["checkout", "-q", "main"]);
    git(repo.path(), &["merge", "-q", "--no-ff", "-m", "merge side", "side"]);
    std::fs::write(
        repo.path().join(".gitstamp.yaml"),
        "log:\n  no_merges: true\n  format: \"%s\"\n",
    )
    .unwrap();

    let configured = stdout_of(gitstamp(repo.path()).arg("log"));
    assert!(!configured.contains("merge side"));
    assert!(configured.contains("side commit"));

    let with_merges = stdout_of(gitstamp(repo.path()).args(["log", "--merges"]));
    assert!(with_merges.starts_with("merge side\n"));
}

#[test]
fn env_overrides_configured_log() {
    let repo = init_repo();
    gitstamp(repo.path())
        .env("GITSTAMP_LOG__FORMAT", "%s")
        .env("GITSTAMP_LOG__COUNT", "1")
        .arg("log")
        .assert()
        .success()
        .stdout("second commit\n");
}

#[test]
fn broken_config_is_reported() {
    let repo = init_repo();
    std::fs::write(repo.path().join(".gitstamp.yaml"), "log:\n  count: 0\n").unwrap();

    gitstamp(repo.path())
        .arg("branch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_then_generate() {
    let repo = init_repo();
    let sub = repo.path().join("nested");
    std::fs::create_dir(&sub).unwrap();

    gitstamp(&sub)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    assert!(repo.path().join(".gitstamp.yaml").is_file());

    gitstamp(repo.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    gitstamp(repo.path())
        .args(["init", "--force", "--quiet"])
        .assert()
        .success()
        .stdout("");

    gitstamp(repo.path()).arg("generate").assert().success();
    let generated = std::fs::read_to_string(repo.path().join("src/git_info.rs")).unwrap();
    assert!(generated.contains("pub const BRANCH_NAME: &str = \"main\";"));
    assert!(!generated.contains("#COMMIT_HASH#"));
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

#[test]
fn version_prints_name() {
    let tmp = TempDir::new().unwrap();
    gitstamp(tmp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("gitstamp version"));
}

#[test]
fn version_reports_git() {
    let tmp = TempDir::new().unwrap();
    gitstamp(tmp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("git: git version"));
}

#[test]
fn version_survives_missing_git_and_broken_config() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(".gitstamp.yaml"), "log: [").unwrap();

    let out = stdout_of(gitstamp(tmp.path()).args([
        "--json",
        "--git",
        "gitstamp-no-such-git",
        "version",
    ]));
    let json: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(json["git_program"], "gitstamp-no-such-git");
    assert!(json["git_version"].is_null());
}

#[test]
fn json_errors_go_to_stderr() {
    let repo = init_repo();
    let output = gitstamp(repo.path())
        .args(["--json", "--git", "gitstamp-no-such-git", "hash"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert!(json["error"].as_str().unwrap().contains("failed to launch"));
}

#[test]
fn completion_bash() {
    let tmp = TempDir::new().unwrap();
    gitstamp(tmp.path())
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gitstamp"));
}
