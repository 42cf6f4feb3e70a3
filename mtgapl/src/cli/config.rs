// mtgapl/src/cli/config.rs
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use colored::Colorize;
use mtgapl_common::config::Config;
use mtgapl_common::error::{MtgaplError, Result};
use mtgapl_common::model::layout::GAME_DATA_DIR;
use tracing::{debug, warn};

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Set the MTG Arena installation directory
    SetPath { dir: PathBuf },
    /// Set the directory holding backups of the original files
    SetBackupPath { dir: PathBuf },
}

impl ConfigArgs {
    pub fn run(&self, config: &Config) -> Result<()> {
        match &self.action {
            ConfigAction::Show => {
                show(config);
                Ok(())
            }
            ConfigAction::SetPath { dir } => {
                let dir = existing_dir(dir)?;
                if !dir.join(GAME_DATA_DIR).is_dir() {
                    warn!(
                        "{} has no {} directory; is this the MTG Arena folder?",
                        dir.display(),
                        GAME_DATA_DIR
                    );
                }
                let mut updated = config.clone();
                updated.install_root = Some(dir);
                save(&updated)
            }
            ConfigAction::SetBackupPath { dir } => {
                let dir = existing_dir(dir)?;
                let mut updated = config.clone();
                updated.backup_root = dir;
                save(&updated)
            }
        }
    }
}

fn existing_dir(dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(MtgaplError::Config(format!(
            "{} is not an existing directory",
            dir.display()
        )));
    }
    Ok(dir.to_path_buf())
}

fn save(config: &Config) -> Result<()> {
    config.save()?;
    debug!("Settings written to {}", config.settings_path().display());
    println!("{}{}", "==> ".bold().blue(), "Settings saved".bold());
    show(config);
    Ok(())
}

fn show(config: &Config) {
    let mtga = config
        .install_root()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "not set".to_string());
    println!("{:>14} {}", "MTGA path:".bold(), mtga);
    println!("{:>14} {}", "Backup path:".bold(), config.backup_root().display());
    println!("{:>14} {}", "Release index:".bold(), config.release_index_url);
    println!("{:>14} {}", "Settings file:".bold(), config.settings_path().display());
}
