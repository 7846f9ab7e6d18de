//! CLI Command Definitions
//!
//! Command-line surface for one-shot token analysis and calibration
//! inspection.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// TokenSentry - multi-factor token risk scoring engine
#[derive(Parser, Debug)]
#[command(
    name = "tokensentry",
    version = env!("CARGO_PKG_VERSION"),
    about = "Token risk scoring engine",
    long_about = "Scores a blockchain token's on-chain and market metadata into a \
                  0-100 risk score with a risk level, confidence rating and \
                  human-readable security flags."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a token snapshot from a JSON file
    Analyze(AnalyzeCmd),

    /// Print the weight profile tables
    Profiles(ProfilesCmd),
}

/// Analyze one token snapshot
#[derive(Parser, Debug)]
pub struct AnalyzeCmd {
    /// Path to a TokenData JSON snapshot
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Path to the calibration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Force an archetype instead of heuristic classification
    /// (standard, meme, stablecoin, defi)
    #[arg(short, long, value_name = "ARCHETYPE")]
    pub archetype: Option<String>,

    /// Emit the full result as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

/// Print weight profiles
#[derive(Parser, Debug)]
pub struct ProfilesCmd {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_command_parses() {
        let app = CliApp::parse_from(["tokensentry", "analyze", "token.json", "--json"]);
        match app.command {
            Command::Analyze(cmd) => {
                assert_eq!(cmd.input, PathBuf::from("token.json"));
                assert!(cmd.json);
                assert_eq!(cmd.config, PathBuf::from("config/default.toml"));
            }
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_archetype_flag_parses() {
        let app = CliApp::parse_from([
            "tokensentry",
            "analyze",
            "token.json",
            "--archetype",
            "meme",
        ]);
        match app.command {
            Command::Analyze(cmd) => assert_eq!(cmd.archetype.as_deref(), Some("meme")),
            _ => panic!("expected analyze command"),
        }
    }

    #[test]
    fn test_global_verbose_flag() {
        let app = CliApp::parse_from(["tokensentry", "-v", "profiles"]);
        assert!(app.verbose);
        assert!(matches!(app.command, Command::Profiles(_)));
    }
}
