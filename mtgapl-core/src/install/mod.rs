// mtgapl-core/src/install/mod.rs
//! The install and revert pipelines.
//!
//! `install` walks CheckingVersion -> Downloading -> Extracting -> BackingUp ->
//! CopyingIn -> Done. A failure stops the run at its stage and nothing already written
//! is rolled back; `revert` is the way back to the originals.

pub mod extract;

use std::path::{Path, PathBuf};

use mtgapl_common::config::Config;
use mtgapl_common::error::{MtgaplError, Result};
use mtgapl_common::model::layout::{entry_path, BACKUP_SENTINEL_DIR};
use mtgapl_common::pipeline::{InstallStage, ProgressReporter};
use mtgapl_common::progress::{ProgressFn, ProgressUnit};
use mtgapl_net::http::{build_http_client, fetch_asset};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::backup::{BackupReport, BackupVault};
use crate::fs::{copy_preserving, create_dir_all};
use crate::version::VersionOracle;

pub use extract::extract_archive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Release tag that was installed.
    pub version: String,
    pub asset_name: String,
    pub files_installed: usize,
    pub backup: BackupReport,
}

pub struct Installer {
    config: Config,
    client: Client,
    oracle: VersionOracle,
}

impl Installer {
    pub fn new(config: Config) -> Result<Self> {
        let client = build_http_client()?;
        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Config, client: Client) -> Self {
        let oracle = VersionOracle::new(client.clone(), config.release_index_url.clone());
        Self {
            config,
            client,
            oracle,
        }
    }

    pub fn oracle(&self) -> &VersionOracle {
        &self.oracle
    }

    pub fn backups_exist(&self) -> bool {
        self.config.backup_root().join(BACKUP_SENTINEL_DIR).is_dir()
    }

    pub async fn install(&self, reporter: &mut dyn ProgressReporter) -> Result<InstallOutcome> {
        let target_root = self.existing_install_root()?;
        let vault = BackupVault::new(&target_root, self.config.backup_root());
        info!("Installing translation into {}", target_root.display());

        enter_stage(reporter, InstallStage::CheckingVersion);
        reporter.step(ProgressUnit::ZERO);
        let release = self
            .oracle
            .latest_release()
            .await
            .map_err(|e| e.in_stage(InstallStage::CheckingVersion))?;
        let asset = release
            .main_asset()
            .map_err(|e| e.in_stage(InstallStage::CheckingVersion))?
            .clone();
        info!("Latest release is {} ({})", release.tag, asset.name);
        reporter.step(ProgressUnit::DONE);

        enter_stage(reporter, InstallStage::Downloading);
        let scratch = tempfile::Builder::new()
            .prefix("mtgapl-")
            .tempdir()
            .map_err(|e| MtgaplError::from(e).in_stage(InstallStage::Downloading))?;
        debug!("Scratch directory {}", scratch.path().display());
        let archive = fetch_asset(
            &self.client,
            &asset.download_url,
            scratch.path(),
            &asset.name,
            &mut |p| reporter.step(p),
        )
        .await
        .map_err(|e| e.in_stage(InstallStage::Downloading))?;

        enter_stage(reporter, InstallStage::Extracting);
        let (source_root, members) = extract_archive(&archive, &mut |p| reporter.step(p))
            .map_err(|e| e.in_stage(InstallStage::Extracting))?;
        debug!("Archive holds {} files", members.len());

        enter_stage(reporter, InstallStage::BackingUp);
        let backup = vault
            .backup(&members, &mut |p| reporter.step(p))
            .map_err(|e| e.in_stage(InstallStage::BackingUp))?;

        enter_stage(reporter, InstallStage::CopyingIn);
        let files_installed =
            copy_new_files(&members, &source_root, &target_root, &mut |p| reporter.step(p))
                .map_err(|e| e.in_stage(InstallStage::CopyingIn))?;

        enter_stage(reporter, InstallStage::Done);
        if let Err(e) = scratch.close() {
            warn!("Failed to remove scratch directory: {}", e);
        }
        info!(
            "Installed {} files from {} ({} originals preserved)",
            files_installed, release.tag, backup.copied
        );

        Ok(InstallOutcome {
            version: release.tag,
            asset_name: asset.name,
            files_installed,
            backup,
        })
    }

    /// Restores the preserved originals. Returns the number of files restored.
    pub fn revert(&self, reporter: &mut dyn ProgressReporter) -> Result<usize> {
        let target_root = self.existing_install_root()?;
        let vault = BackupVault::new(&target_root, self.config.backup_root());
        enter_stage(reporter, InstallStage::Reverting);
        if !vault.backups_exist() {
            return Err(MtgaplError::BackupMissing(
                vault.backup_root().display().to_string(),
            )
            .in_stage(InstallStage::Reverting));
        }
        reporter.step(ProgressUnit::ZERO);
        let restored = vault
            .restore()
            .map_err(|e| e.in_stage(InstallStage::Reverting))?;
        reporter.step(ProgressUnit::DONE);
        enter_stage(reporter, InstallStage::Done);
        info!("Reverted {} files", restored);
        Ok(restored)
    }

    fn existing_install_root(&self) -> Result<PathBuf> {
        let root = self.config.require_install_root()?;
        if !root.is_dir() {
            return Err(MtgaplError::Config(format!(
                "MTG Arena directory {} does not exist",
                root.display()
            )));
        }
        Ok(root.to_path_buf())
    }
}

fn enter_stage(reporter: &mut dyn ProgressReporter, stage: InstallStage) {
    debug!("Entering stage: {}", stage);
    reporter.stage(stage);
    reporter.overall(stage.overall_checkpoint());
}

/// Copies every extracted member from `source_root` over `target_root`, unconditionally.
pub fn copy_new_files(
    members: &[String],
    source_root: &Path,
    target_root: &Path,
    on_progress: &mut ProgressFn<'_>,
) -> Result<usize> {
    let total = members.len() as u64;
    on_progress(ProgressUnit::ZERO);
    for (done, member) in members.iter().enumerate() {
        let src = entry_path(source_root, member);
        let dst = entry_path(target_root, member);
        if let Some(parent) = dst.parent() {
            create_dir_all(parent)?;
        }
        copy_preserving(&src, &dst)?;
        on_progress(ProgressUnit::ratio(done as u64 + 1, total));
    }
    on_progress(ProgressUnit::DONE);
    Ok(members.len())
}
