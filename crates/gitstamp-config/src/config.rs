//! Configuration types and loading for gitstamp.
//!
//! The main entry point is [`StampConfig`], the contents of `.gitstamp.yaml`.
//! Configuration is loaded with [`load_config`], which layers built-in
//! defaults, the YAML file, and `GITSTAMP_*` environment variables (nested
//! keys separated by `__`, e.g. `GITSTAMP_LOG__COUNT=3`).

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use gitstamp_git::CommitLogOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up when discovering configuration.
pub const CONFIG_FILE_NAME: &str = ".gitstamp.yaml";

/// Prefix of environment variables that override configuration values.
pub const ENV_PREFIX: &str = "GITSTAMP_";

const DEFAULT_LOG_COUNT: NonZeroU32 = NonZeroU32::new(10).unwrap();

const DEFAULT_LOG_FORMAT: &str = "%h %cd %cn %s";

/// Template written by `gitstamp init`.
const STARTER_TEMPLATE: &str = r###"//! Generated by gitstamp. Do not edit.

pub const BRANCH_NAME: &str = "#BRANCH_NAME#";
pub const COMMIT_HASH: &str = "#COMMIT_HASH#";
pub const SHORT_COMMIT_HASH: &str = "#SHORT_COMMIT_HASH#";
pub const COMMIT_LOG: &str = r##"#COMMIT_LOG#"##;
"###;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The layered configuration could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(#[from] figment::Error),

    /// The configuration could not be serialized to YAML.
    #[error("failed to serialize configuration: {0}")]
    SerializeError(#[from] serde_yaml::Error),

    /// An explicitly requested configuration file does not exist.
    #[error("config file not found: {}", path.display())]
    ConfigNotFound {
        /// The path that was requested.
        path: PathBuf,
    },

    /// A template file named by a target could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    TemplateRead {
        /// The template path, resolved against the config directory.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// How git is launched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitConfig {
    /// Executable to run, looked up on `PATH`.
    #[serde(default = "default_git_program")]
    pub program: String,

    /// Kill git after this many seconds. Unset means wait forever.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Treat a non-zero git exit status as an error instead of using
    /// whatever git printed on stdout.
    #[serde(default)]
    pub strict: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: default_git_program(),
            timeout_secs: None,
            strict: false,
        }
    }
}

impl GitConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn default_git_program() -> String {
    gitstamp_git::commands::DEFAULT_GIT_PROGRAM.to_string()
}

/// Default commit log options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Number of entries.
    #[serde(default = "default_log_count")]
    pub count: NonZeroU32,

    /// Leave merge commits out.
    #[serde(default)]
    pub no_merges: bool,

    /// Pretty-format string.
    #[serde(
        default = "default_log_format",
        deserialize_with = "format_string::deserialize"
    )]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            count: default_log_count(),
            no_merges: false,
            format: default_log_format(),
        }
    }
}

impl LogConfig {
    pub fn to_options(&self) -> CommitLogOptions {
        CommitLogOptions::new(self.count, self.no_merges, self.format.clone())
    }
}

fn default_log_count() -> NonZeroU32 {
    DEFAULT_LOG_COUNT
}

fn default_log_format() -> String {
    DEFAULT_LOG_FORMAT.to_string()
}

/// Pretty-format strings read back as text even when they look like another
/// scalar. Environment values such as `GITSTAMP_LOG__FORMAT=123` arrive as
/// numbers.
mod format_string {
    use std::fmt;

    use serde::Deserializer;
    use serde::de::{self, Visitor};

    struct FormatVisitor;

    impl Visitor<'_> for FormatVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a git pretty-format string")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_char<E: de::Error>(self, v: char) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        deserializer.deserialize_any(FormatVisitor)
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        deserialize(deserializer).map(Some)
    }
}

/// Per-target overrides of the top-level `log` section. Unset fields fall
/// back to the top-level values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<NonZeroU32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_merges: Option<bool>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "format_string::deserialize_option"
    )]
    pub format: Option<String>,
}

impl LogOverride {
    pub fn is_empty(&self) -> bool {
        self.count.is_none() && self.no_merges.is_none() && self.format.is_none()
    }

    /// Layer these overrides on top of `base`.
    pub fn apply(&self, base: &LogConfig) -> LogConfig {
        LogConfig {
            count: self.count.unwrap_or(base.count),
            no_merges: self.no_merges.unwrap_or(base.no_merges),
            format: self.format.clone().unwrap_or_else(|| base.format.clone()),
        }
    }
}

/// Where a target's template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// Read from this file.
    File(PathBuf),
    /// Given inline in the configuration.
    Inline(String),
}

impl TemplateSource {
    /// The template text.
    pub fn read(&self) -> Result<String> {
        match self {
            Self::File(path) => {
                std::fs::read_to_string(path).map_err(|source| ConfigError::TemplateRead {
                    path: path.clone(),
                    source,
                })
            }
            Self::Inline(text) => Ok(text.clone()),
        }
    }
}

/// One file that `gitstamp generate` produces.
///
/// Relative `output` and `template` paths are resolved against the directory
/// that holds the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// File to write.
    pub output: PathBuf,

    /// Template file. Mutually exclusive with `template_text`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<PathBuf>,

    /// Inline template. Mutually exclusive with `template`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_text: Option<String>,

    /// Log options for this target only.
    #[serde(default, skip_serializing_if = "LogOverride::is_empty")]
    pub log: LogOverride,
}

impl TargetConfig {
    /// Where the rendered file goes.
    pub fn output_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.output)
    }

    /// Where the template comes from.
    pub fn source(&self, base_dir: &Path) -> Result<TemplateSource> {
        match (&self.template, &self.template_text) {
            (Some(path), None) => Ok(TemplateSource::File(base_dir.join(path))),
            (None, Some(text)) => Ok(TemplateSource::Inline(text.clone())),
            _ => Err(ConfigError::InvalidValue {
                key: format!("targets[{}]", self.output.display()),
                reason: "exactly one of 'template' or 'template_text' must be set".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full gitstamp configuration, corresponding to `.gitstamp.yaml`.
///
/// All fields use `serde` defaults so a partially specified file still
/// loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampConfig {
    /// Directory git runs in (default: the current directory).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<PathBuf>,

    /// Git launch settings.
    #[serde(default)]
    pub git: GitConfig,

    /// Default commit log options.
    #[serde(default)]
    pub log: LogConfig,

    /// Files produced by `gitstamp generate`.
    #[serde(default)]
    pub targets: Vec<TargetConfig>,

    /// Directory of the file this configuration was loaded from. Empty when
    /// no file was involved, so relative paths resolve against the current
    /// directory.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl StampConfig {
    /// A configuration with one target that writes `src/git_info.rs`.
    pub fn starter() -> Self {
        Self {
            targets: vec![TargetConfig {
                output: PathBuf::from("src/git_info.rs"),
                template: None,
                template_text: Some(STARTER_TEMPLATE.to_string()),
                log: LogOverride::default(),
            }],
            ..Self::default()
        }
    }

    /// Log options for `target`, with its overrides applied.
    pub fn log_for(&self, target: &TargetConfig) -> CommitLogOptions {
        target.log.apply(&self.log).to_options()
    }

    /// Check values that serde alone cannot.
    pub fn validate(&self) -> Result<()> {
        if self.git.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "git.program".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.git.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "git.timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        for target in &self.targets {
            if target.output.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "targets.output".to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
            target.source(&self.base_dir)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from `path` (if any), layered over the defaults and
/// under `GITSTAMP_*` environment variables.
///
/// # Errors
///
/// Returns [`ConfigError::ConfigNotFound`] if `path` does not exist,
/// [`ConfigError::ParseError`] for malformed YAML or values of the wrong
/// type, and [`ConfigError::InvalidValue`] when validation fails.
pub fn load_config(path: Option<&Path>) -> Result<StampConfig> {
    let mut figment = Figment::from(Serialized::defaults(StampConfig::default()));

    if let Some(path) = path {
        if !path.is_file() {
            return Err(ConfigError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        figment = figment.merge(Yaml::file(path));
    }

    let mut config: StampConfig = figment
        .merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&[crate::config_file::CONFIG_ENV_KEY])
                .split("__"),
        )
        .extract()?;

    if let Some(dir) = path.and_then(Path::parent) {
        config.base_dir = dir.to_path_buf();
    }

    config.validate()?;
    Ok(config)
}

/// Write `config` to `.gitstamp.yaml` inside `dir`, creating `dir` if needed.
///
/// Returns the path of the written file.
pub fn save_config(dir: &Path, config: &StampConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let path = dir.join(CONFIG_FILE_NAME);
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(&path, yaml)?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
