//! Configuration management for gitstamp.
//!
//! This crate loads `.gitstamp.yaml` files (layered with built-in defaults
//! and `GITSTAMP_*` environment variables), discovers them by walking up the
//! directory tree, and writes starter files for `gitstamp init`.

pub mod config;
pub mod config_file;

pub use config::{ConfigError, LogConfig, StampConfig, TargetConfig, TemplateSource};
