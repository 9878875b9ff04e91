//! Core of gitstamp: placeholder tokens, resolved git values, and the
//! generator that renders a template to disk.
//!
//! - [`token`]: the four placeholder tokens and plain-text substitution
//! - [`values`]: the resolved branch/hash/log values
//! - [`generator`]: resolve, substitute, and write a file atomically

pub mod error;
pub mod generator;
pub mod token;
pub mod values;

pub use error::{RenderError, Result};
pub use generator::Generator;
pub use token::{Token, substitute};
pub use values::TemplateValues;
