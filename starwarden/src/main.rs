//! `starwarden` command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use starwarden::{
    PatternCache, compile,
    config::{self, ConfigError},
    platform::GuildId,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "starwarden", version, about = "Star reaction gating")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a configuration and print the compiled gate.
    Check {
        /// Path to a `.json` or `.toml` configuration.
        config: PathBuf,
    },
    /// Write an example configuration.
    Example {
        /// Where to write it; the extension picks the format.
        path: PathBuf,
        /// Guild identifier to put in the example.
        #[arg(long, default_value_t = 0)]
        guild_id: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Check { config } => check(config),
        Command::Example { path, guild_id } => {
            config::write_example(&path, GuildId(guild_id))
                .with_context(|| format!("writing example to {}", path.display()))?;
            println!("wrote {}", path.display());
            Ok(())
        }
    }
}

fn check(path: PathBuf) -> Result<()> {
    let config = match config::load_or_write_example(&path) {
        Ok(config) => config,
        Err(error @ ConfigError::Missing { .. }) => return Err(error.into()),
        Err(error) => return Err(error).with_context(|| format!("loading {}", path.display())),
    };

    let patterns = config
        .validate_patterns(&PatternCache::global())
        .context("compiling username patterns")?;
    let gate = compile(&config);

    println!("guild {} watching {}", config.guild_id, config.star_emoji);
    if gate.is_empty() {
        println!("no gating steps configured; every star is accepted");
    }
    for (position, step) in gate.step_names().enumerate() {
        println!("{}. {step}", position + 1);
    }
    if let Some(timeout) = config.step_timeout() {
        println!("per-step deadline: {timeout:?}");
    }
    tracing::info!(steps = gate.len(), patterns, "configuration ok");
    Ok(())
}
