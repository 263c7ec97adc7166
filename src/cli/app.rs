//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::Output;
use super::{key_provider_cmd, method_cmd};
use crate::config::Config;
use crate::plugin::{ensure_piped, StdoutProbe};

#[derive(Parser)]
#[command(name = "extcrypt")]
#[command(author, version, about = "External key provider and encryption method plugins")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "EXTCRYPT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose diagnostics on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run as an external key provider
    #[command(subcommand)]
    KeyProvider(key_provider_cmd::KeyProviderCommands),

    /// Run as an external encryption method
    #[command(subcommand)]
    Method(method_cmd::MethodCommands),
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.verbose);

    // Refuse terminals before anything else can fail or print
    ensure_piped(&StdoutProbe)?;

    let config = Config::load(cli.config.as_deref())?;
    output.verbose_ctx(
        "config",
        &match &cli.config {
            Some(path) => format!("Loaded {}", path.display()),
            None => "Using user config directory or defaults".to_string(),
        },
    );

    match cli.command {
        Commands::KeyProvider(cmd) => key_provider_cmd::run(cmd, &config, &output)?,
        Commands::Method(cmd) => method_cmd::run(cmd, &config, &output)?,
    }

    output.verbose("Exchange completed");
    Ok(())
}
