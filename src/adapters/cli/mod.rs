//! CLI Adapter

pub mod commands;

pub use commands::{AnalyzeCmd, CliApp, Command, ProfilesCmd};
