// mtgapl/src/cli/backup.rs
use clap::{Args, Subcommand};
use colored::Colorize;
use mtgapl_common::config::Config;
use mtgapl_common::error::Result;
use mtgapl_core::BackupVault;

#[derive(Debug, Args)]
pub struct BackupArgs {
    #[command(subcommand)]
    pub action: BackupAction,
}

#[derive(Debug, Subcommand)]
pub enum BackupAction {
    /// List the preserved original files
    List,
    /// Delete every preserved original
    Clear {
        /// Required; clearing makes `revert` impossible until the next install
        #[arg(long)]
        yes: bool,
    },
}

impl BackupArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        let target_root = config.require_install_root()?;
        let vault = BackupVault::new(target_root, config.backup_root());

        match &self.action {
            BackupAction::List => {
                let files = vault.backed_up_files()?;
                if files.is_empty() {
                    println!("No backups in {}", config.backup_root().display());
                    return Ok(());
                }
                println!(
                    "{}{} ({})",
                    "==> ".bold().blue(),
                    "Backed up files".bold(),
                    config.backup_root().display()
                );
                for file in &files {
                    println!("  {}", file.display());
                }
                println!("{} files", files.len());
            }
            BackupAction::Clear { yes } => {
                if !yes {
                    println!(
                        "{} Clearing removes the only copy of the original files. Re-run with --yes to confirm.",
                        "Warning:".yellow().bold()
                    );
                    return Ok(());
                }
                let removed = vault.clear()?;
                println!(
                    "{}Removed {} backed up files",
                    "==> ".bold().blue(),
                    removed
                );
            }
        }
        Ok(())
    }
}
