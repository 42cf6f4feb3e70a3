// mtgapl/src/cli/status.rs
use clap::Args;
use colored::Colorize;
use mtgapl_common::config::Config;
use mtgapl_common::error::Result;
use mtgapl_core::Installer;
use tracing::warn;

#[derive(Args, Debug)]
pub struct Status {
    /// Skip the release index and only report what is installed
    #[arg(long)]
    pub offline: bool,
}

impl Status {
    pub async fn run(&self, config: &Config) -> Result<()> {
        let installer = Installer::new(config.clone())?;
        let oracle = installer.oracle();

        match config.install_root() {
            Some(root) => println!("{:>18} {}", "MTG Arena:".bold(), root.display()),
            None => println!(
                "{:>18} {}",
                "MTG Arena:".bold(),
                "not set (use `mtgapl config set-path <dir>`)".yellow()
            ),
        }

        let installed = oracle.installed_version(config.install_root());
        if let Err(e) = &installed {
            warn!("Could not read the installed version: {}", e);
        }
        let installed_shown = match &installed {
            Ok(_) => installed_label(&installed).normal(),
            Err(_) => installed_label(&installed).red(),
        };
        println!("{:>18} {}", "Installed:".bold(), installed_shown);
        let installed = installed.ok().flatten();

        if !self.offline {
            match oracle.check_latest_version().await {
                Ok(latest) => {
                    let latest_shown = if installed.as_deref() == Some(latest.as_str()) {
                        latest.green()
                    } else {
                        latest.yellow().bold()
                    };
                    println!("{:>18} {}", "Latest:".bold(), latest_shown);
                }
                Err(e) => {
                    warn!("Could not reach the release index: {}", e);
                    println!("{:>18} {}", "Latest:".bold(), "unavailable".red());
                }
            }
        }

        let backups = if installer.backups_exist() {
            "present".green()
        } else {
            "none".dimmed()
        };
        println!("{:>18} {} ({})", "Backups:".bold(), backups, config.backup_root().display());
        Ok(())
    }
}

fn installed_label(installed: &Result<Option<String>>) -> String {
    match installed {
        Ok(Some(version)) => version.clone(),
        Ok(None) => "none".to_string(),
        Err(e) => format!("unknown ({})", e.root_cause()),
    }
}
