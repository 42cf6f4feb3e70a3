// mtgapl/src/cli/check.rs
//! Contains the logic for the `check` command.
use clap::Args;
use colored::Colorize;
use mtgapl_common::config::Config;
use mtgapl_common::error::Result;
use mtgapl_core::VersionOracle;

#[derive(Args, Debug)]
pub struct Check;

impl Check {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let oracle = VersionOracle::from_config(config)?;
        tracing::debug!("Querying release index {}", oracle.index_url());

        // Remote only; the local install is never read here.
        let latest = oracle.check_latest_version().await?;
        println!(
            "{}{} {}",
            "==> ".bold().blue(),
            "Latest version:".bold(),
            latest.green()
        );
        Ok(())
    }
}
