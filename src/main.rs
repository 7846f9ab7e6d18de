//! TokenSentry - Token Risk Scoring Engine CLI
//!
//! One-shot analysis of a token snapshot plus calibration inspection.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use tokensentry::adapters::cli::{AnalyzeCmd, CliApp, Command};
use tokensentry::adapters::{InMemoryBehavioralCache, OfflineBehavioralPort};
use tokensentry::application::RiskAnalyzer;
use tokensentry::config::{load_config, ScoringConfig};
use tokensentry::domain::{TokenArchetype, TokenData, WeightProfile};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let app = CliApp::parse();
    init_logging(app.verbose, app.debug);

    match app.command {
        Command::Analyze(cmd) => analyze_command(cmd).await,
        Command::Profiles(_) => profiles_command(),
    }
}

fn init_logging(verbose: bool, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    fmt().with_env_filter(filter).init();
}

async fn analyze_command(cmd: AnalyzeCmd) -> Result<()> {
    let config_path = shellexpand::tilde(&cmd.config.to_string_lossy()).into_owned();
    let config = if std::path::Path::new(&config_path).exists() {
        load_config(&config_path)
            .with_context(|| format!("failed to load calibration from {}", config_path))?
    } else {
        tracing::info!("no calibration file at {}, using defaults", config_path);
        ScoringConfig::default()
    };

    let input = std::fs::read_to_string(&cmd.input)
        .with_context(|| format!("failed to read {}", cmd.input.display()))?;
    let token: TokenData =
        serde_json::from_str(&input).context("failed to parse token snapshot JSON")?;

    let hint = cmd.archetype.as_deref().map(parse_archetype).transpose()?;

    let analyzer = RiskAnalyzer::new(
        config,
        Arc::new(InMemoryBehavioralCache::new()),
        Arc::new(OfflineBehavioralPort::new()),
    );
    let result = analyzer
        .analyze(&token, hint)
        .await
        .context("analysis failed")?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} ({}) on {} - score {}/100 [{}], confidence {}%",
        token.symbol,
        result.archetype,
        token.chain,
        result.overall_risk_score,
        result.risk_level,
        result.confidence_score
    );
    for (factor, score) in &result.breakdown {
        println!("  {:<22} {:>3}", factor, score);
    }
    for flag in &result.critical_flags {
        println!("  CRITICAL: {}", flag);
    }
    for flag in &result.warning_flags {
        println!("  warning:  {}", flag);
    }
    for signal in &result.positive_signals {
        println!("  +         {}", signal);
    }
    Ok(())
}

fn parse_archetype(value: &str) -> Result<TokenArchetype> {
    match value.to_lowercase().as_str() {
        "standard" => Ok(TokenArchetype::Standard),
        "meme" => Ok(TokenArchetype::Meme),
        "stablecoin" => Ok(TokenArchetype::Stablecoin),
        "defi" => Ok(TokenArchetype::Defi),
        other => bail!("unknown archetype '{}'", other),
    }
}

fn profiles_command() -> Result<()> {
    for archetype in [
        TokenArchetype::Standard,
        TokenArchetype::Meme,
        TokenArchetype::Stablecoin,
        TokenArchetype::Defi,
    ] {
        let profile = WeightProfile::for_archetype(archetype);
        println!("{}", serde_json::to_string_pretty(&profile)?);
    }
    Ok(())
}
