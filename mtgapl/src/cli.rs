// mtgapl/src/cli.rs
//! Defines the command-line argument structure using clap.
use clap::{ArgAction, Parser, Subcommand};
use mtgapl_common::config::Config;
use mtgapl_common::error::Result;

pub mod backup;
pub mod check;
pub mod config;
pub mod install;
pub mod revert;
pub mod status;

use crate::cli::backup::BackupArgs;
use crate::cli::check::Check;
use crate::cli::config::ConfigArgs;
use crate::cli::install::Install;
use crate::cli::revert::Revert;
use crate::cli::status::Status;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "mtgapl", bin_name = "mtgapl")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the installed and latest translation versions
    Status(Status),
    /// Ask the release index for the latest version
    Check(Check),
    /// Download and install the latest translation
    Install(Install),
    /// Restore the original game files
    Revert(Revert),
    /// Show or change settings
    Config(ConfigArgs),
    /// Inspect or clear the backup store
    Backup(BackupArgs),
}

impl Command {
    pub async fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Status(command) => command.run(config).await,
            Self::Check(command) => command.run(config).await,
            Self::Install(command) => command.run(config).await,
            Self::Revert(command) => command.run(config),
            Self::Config(command) => command.run(config),
            Self::Backup(command) => command.run(config),
        }
    }
}
