// mtgapl/src/cli/install.rs

use clap::Args;
use colored::Colorize;
use mtgapl_common::config::Config;
use mtgapl_common::error::Result;
use mtgapl_core::Installer;
use tracing::{instrument, warn};

use crate::ui::BarReporter;

#[derive(Debug, Args)]
pub struct Install {
    /// Install even when the latest version is already in place
    #[arg(long)]
    pub force: bool,
}

impl Install {
    #[instrument(skip(self, config))]
    pub async fn run(&self, config: &Config) -> Result<()> {
        let installer = Installer::new(config.clone())?;
        let root = config.require_install_root()?;

        if !self.force {
            let latest = installer.oracle().check_latest_version().await?;
            let installed = installer.oracle().installed_version(Some(root));
            if already_current(installed, &latest) {
                println!(
                    "{}{} {} {}",
                    "==> ".bold().blue(),
                    "Translation".bold(),
                    latest.green(),
                    "is already installed (use --force to reinstall)".bold()
                );
                return Ok(());
            }
        }

        let mut reporter = BarReporter::new();
        let outcome = match installer.install(&mut reporter).await {
            Ok(outcome) => {
                reporter.finish();
                outcome
            }
            Err(e) => {
                reporter.abandon();
                return Err(e);
            }
        };

        println!(
            "{}{} {} ({} files, {} originals backed up)",
            "==> ".bold().blue(),
            "Installed".bold().green(),
            outcome.version.bold(),
            outcome.files_installed,
            outcome.backup.copied
        );
        Ok(())
    }
}

/// An installed version that cannot be read never blocks an install.
fn already_current(installed: Result<Option<String>>, latest: &str) -> bool {
    match installed {
        Ok(installed) => installed.as_deref() == Some(latest),
        Err(e) => {
            warn!("Could not read the installed version, installing anyway: {}", e);
            false
        }
    }
}
