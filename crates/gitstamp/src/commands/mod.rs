//! Command handlers, one module per subcommand.

pub mod completion;
pub mod generate;
pub mod info;
pub mod init;
pub mod log;
pub mod values;
pub mod version;
