//! Command-line interface.

use anyhow::Context;
use clap::{Parser, Subcommand};

use rotom_domain::config::{Config, ConfigSeverity};

#[derive(Parser)]
#[command(
    name = "rotomcoach",
    version,
    about = "LLM-backed competitive Pokemon coaching gateway"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server (the default).
    Serve,
    /// Configuration helpers.
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Print the version.
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Validate the config file and report issues.
    Validate,
    /// Print the effective configuration.
    Show,
}

/// Load configuration from `$RC_CONFIG` or `./config.toml`. Defaults
/// apply when the file is absent.
pub fn load_config() -> anyhow::Result<(Config, String)> {
    let path = std::env::var("RC_CONFIG").unwrap_or_else(|_| "config.toml".into());

    let config = if std::path::Path::new(&path).exists() {
        let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
        toml::from_str(&raw).with_context(|| format!("parsing {path}"))?
    } else {
        Config::default()
    };

    Ok((config, path))
}

/// Print validation issues. Returns `false` when any error-severity
/// issue exists.
pub fn validate(config: &Config, path: &str) -> bool {
    let issues = config.validate();
    if issues.is_empty() {
        println!("{path}: OK");
        return true;
    }
    for issue in &issues {
        println!("{issue}");
    }
    !issues
        .iter()
        .any(|i| i.severity == ConfigSeverity::Error)
}

/// Print the effective configuration as TOML.
pub fn show(config: &Config) {
    match toml::to_string_pretty(config) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("could not render config: {e}"),
    }
}
