// mtgapl/src/cli/revert.rs
use clap::Args;
use colored::Colorize;
use mtgapl_common::config::Config;
use mtgapl_common::error::{MtgaplError, Result};
use mtgapl_core::Installer;

use crate::ui::BarReporter;

#[derive(Debug, Args)]
pub struct Revert;

impl Revert {
    pub fn run(&self, config: &Config) -> Result<()> {
        let installer = Installer::new(config.clone())?;
        if !installer.backups_exist() {
            return Err(MtgaplError::BackupMissing(format!(
                "no backups in {}; nothing to revert",
                config.backup_root().display()
            )));
        }

        let mut reporter = BarReporter::new();
        let restored = match installer.revert(&mut reporter) {
            Ok(restored) => {
                reporter.finish();
                restored
            }
            Err(e) => {
                reporter.abandon();
                return Err(e);
            }
        };

        println!(
            "{}{} ({} files restored)",
            "==> ".bold().blue(),
            "Original game files restored".bold().green(),
            restored
        );
        Ok(())
    }
}
