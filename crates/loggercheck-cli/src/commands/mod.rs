//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_dialects;
pub mod output;
