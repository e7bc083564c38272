//! CLI for relscan.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use relscan_core::config::{self, ReleaseConfig};
use std::path::PathBuf;

use commands::{run_completions, run_hash, run_publish, run_scan};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "relscan")]
#[command(
    about = "Hash release files, submit the artifact to VirusTotal, print release-note Markdown",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload the artifact, hash the release directory, and print the Markdown summary.
    Publish {
        /// Artifact to upload (overrides `artifact_path` from config).
        #[arg(long, value_name = "PATH")]
        artifact: Option<PathBuf>,
        /// Directory to hash (overrides `release_dir` from config).
        #[arg(long, value_name = "DIR")]
        release_dir: Option<PathBuf>,
    },

    /// Hash the release directory and write sidecars, without contacting VirusTotal.
    Hash {
        /// Directory to hash (overrides `release_dir` from config).
        #[arg(long, value_name = "DIR")]
        release_dir: Option<PathBuf>,
    },

    /// Upload the artifact only and print the report link.
    Scan {
        /// Artifact to upload (overrides `artifact_path` from config).
        #[arg(long, value_name = "PATH")]
        artifact: Option<PathBuf>,
    },

    /// Print a shell completion script to stdout.
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Apply command-line path overrides on top of the loaded config.
pub(crate) fn apply_overrides(
    mut cfg: ReleaseConfig,
    artifact: Option<PathBuf>,
    release_dir: Option<PathBuf>,
) -> ReleaseConfig {
    if let Some(p) = artifact {
        cfg.artifact_path = p;
    }
    if let Some(d) = release_dir {
        cfg.release_dir = d;
    }
    cfg
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Publish {
                artifact,
                release_dir,
            } => {
                let cfg = apply_overrides(load_config()?, artifact, release_dir);
                run_publish(&cfg)?;
            }
            CliCommand::Hash { release_dir } => {
                let cfg = apply_overrides(load_config()?, None, release_dir);
                run_hash(&cfg)?;
            }
            CliCommand::Scan { artifact } => {
                let cfg = apply_overrides(load_config()?, artifact, None);
                run_scan(&cfg)?;
            }
        }

        Ok(())
    }
}

fn load_config() -> Result<ReleaseConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
