// mtgapl-core/src/backup.rs
//! Selective preservation of original game data files.
//!
//! The store mirrors the installation tree: a file present under
//! `backup_root/MTGA_Data/...` is the preserved original of the same path under the
//! install root. There is no manifest.

use std::fs;
use std::path::{Path, PathBuf};

use mtgapl_common::error::{MtgaplError, Result};
use mtgapl_common::model::layout::{
    entry_path, is_data_file, paired_asset, BACKUP_SENTINEL_DIR, GAME_DATA_DIR, TRANSLATION_MARKER,
};
use mtgapl_common::progress::{ProgressFn, ProgressUnit};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::fs::{copy_preserving, copy_tree, create_dir_all};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackupReport {
    /// Extracted `.dat` members considered for backup.
    pub candidates: usize,
    /// Data files preserved (each together with its paired asset).
    pub copied: usize,
    /// Already carrying the translation marker, so not an original.
    pub skipped_translated: usize,
    /// Not present in the installation.
    pub skipped_missing: usize,
}

#[derive(Debug, Clone)]
pub struct BackupVault {
    target_root: PathBuf,
    backup_root: PathBuf,
}

impl BackupVault {
    pub fn new(target_root: impl Into<PathBuf>, backup_root: impl Into<PathBuf>) -> Self {
        Self {
            target_root: target_root.into(),
            backup_root: backup_root.into(),
        }
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Preserves the installed originals of every `.dat` member (and its paired asset)
    /// that is about to be overwritten.
    pub fn backup(
        &self,
        members: &[String],
        on_progress: &mut ProgressFn<'_>,
    ) -> Result<BackupReport> {
        let candidates: Vec<&str> = members
            .iter()
            .map(String::as_str)
            .filter(|m| is_data_file(m))
            .collect();
        let total = candidates.len() as u64;
        let mut report = BackupReport {
            candidates: candidates.len(),
            ..BackupReport::default()
        };
        debug!(
            "Backing up {} candidate data files into {}",
            report.candidates,
            self.backup_root.display()
        );

        on_progress(ProgressUnit::ZERO);
        for (done, data_file) in candidates.iter().enumerate() {
            let installed = entry_path(&self.target_root, data_file);
            if !installed.is_file() {
                debug!("Not installed, nothing to preserve: {}", installed.display());
                report.skipped_missing += 1;
            } else if is_translated(&installed)? {
                debug!("Already translated, keeping existing backup: {}", data_file);
                report.skipped_translated += 1;
            } else {
                self.preserve(data_file)?;
                self.preserve_asset(paired_asset(data_file))?;
                report.copied += 1;
            }
            on_progress(ProgressUnit::ratio(done as u64 + 1, total));
        }
        on_progress(ProgressUnit::DONE);

        info!(
            "Backup finished: {} preserved, {} already translated, {} missing",
            report.copied, report.skipped_translated, report.skipped_missing
        );
        Ok(report)
    }

    fn preserve(&self, entry: &str) -> Result<()> {
        let src = entry_path(&self.target_root, entry);
        let dst = entry_path(&self.backup_root, entry);
        if let Some(parent) = dst.parent() {
            create_dir_all(parent)?;
        }
        copy_preserving(&src, &dst)?;
        Ok(())
    }

    fn preserve_asset(&self, entry: &str) -> Result<()> {
        if entry_path(&self.target_root, entry).is_file() {
            self.preserve(entry)
        } else {
            warn!("Paired asset {} is not installed, preserving the data file alone", entry);
            Ok(())
        }
    }

    /// Copies the whole mirrored store back over the installation. Returns the number of
    /// files restored. The store itself is left in place.
    pub fn restore(&self) -> Result<usize> {
        let src = self.backup_root.join(GAME_DATA_DIR);
        if !src.is_dir() {
            return Err(MtgaplError::BackupMissing(src.display().to_string()));
        }
        let dst = self.target_root.join(GAME_DATA_DIR);
        let restored = copy_tree(&src, &dst)?;
        info!("Restored {} original files into {}", restored, dst.display());
        Ok(restored)
    }

    pub fn backups_exist(&self) -> bool {
        self.backup_root.join(BACKUP_SENTINEL_DIR).is_dir()
    }

    /// Relative paths (from the backup root) of every preserved file, sorted.
    pub fn backed_up_files(&self) -> Result<Vec<PathBuf>> {
        let store = self.backup_root.join(GAME_DATA_DIR);
        if !store.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in WalkDir::new(&store).follow_links(true) {
            let entry = entry.map_err(|e| {
                MtgaplError::Filesystem(format!("Failed to walk {}: {}", store.display(), e))
            })?;
            if entry.file_type().is_file() {
                if let Ok(relative) = entry.path().strip_prefix(&self.backup_root) {
                    files.push(relative.to_path_buf());
                }
            }
        }
        files.sort();
        Ok(files)
    }

    /// Deletes the mirrored store. Returns how many files were removed.
    pub fn clear(&self) -> Result<usize> {
        let store = self.backup_root.join(GAME_DATA_DIR);
        if !store.exists() {
            return Ok(0);
        }
        let count = self.backed_up_files()?.len();
        fs::remove_dir_all(&store).map_err(|e| {
            MtgaplError::Filesystem(format!("Failed to remove {}: {}", store.display(), e))
        })?;
        info!("Removed {} backed up files from {}", count, store.display());
        Ok(count)
    }
}

/// Whether the file already carries the translation marker anywhere in its bytes.
pub fn is_translated(path: &Path) -> Result<bool> {
    let bytes = fs::read(path).map_err(|e| {
        MtgaplError::Filesystem(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let marker = TRANSLATION_MARKER.as_bytes();
    Ok(bytes.windows(marker.len()).any(|w| w == marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "MTGA_Data/Downloads/Data/data_loc_en.dat";
    const ASSET: &str = "MTGA_Data/Downloads/Data/data_loc_en";

    fn write(root: &Path, entry: &str, body: &[u8]) {
        let path = entry_path(root, entry);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, body).unwrap();
    }

    fn read(root: &Path, entry: &str) -> Vec<u8> {
        fs::read(entry_path(root, entry)).unwrap()
    }

    fn members(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn preserves_original_pair_byte_for_byte() {
        let target = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        write(target.path(), DATA, b"original english strings");
        write(target.path(), ASSET, b"\x00\x01asset");

        let vault = BackupVault::new(target.path(), store.path());
        let mut seen = Vec::new();
        let report = vault
            .backup(&members(&[DATA, ASSET]), &mut |p| seen.push(p.value()))
            .unwrap();

        assert_eq!(report.candidates, 1);
        assert_eq!(report.copied, 1);
        assert_eq!(read(store.path(), DATA), b"original english strings");
        assert_eq!(read(store.path(), ASSET), b"\x00\x01asset");
        assert_eq!(seen, vec![0, 1000, 1000]);
        assert!(vault.backups_exist());
    }

    #[test]
    fn skips_translated_and_missing_files() {
        let target = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        write(target.path(), DATA, b"header\nmtgapl:v3.0\n");
        write(target.path(), ASSET, b"asset");

        let vault = BackupVault::new(target.path(), store.path());
        let report = vault
            .backup(
                &members(&[DATA, "MTGA_Data/Downloads/Data/data_cards.dat"]),
                &mut |_| {},
            )
            .unwrap();

        assert_eq!(
            report,
            BackupReport {
                candidates: 2,
                copied: 0,
                skipped_translated: 1,
                skipped_missing: 1,
            }
        );
        assert!(!entry_path(store.path(), DATA).exists());
        assert!(!vault.backups_exist());
    }

    #[test]
    fn zero_candidates_still_finishes() {
        let target = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        let vault = BackupVault::new(target.path(), store.path());

        let mut seen = Vec::new();
        let report = vault
            .backup(&members(&["readme.txt"]), &mut |p| seen.push(p.value()))
            .unwrap();

        assert_eq!(report.candidates, 0);
        assert_eq!(seen.first(), Some(&0));
        assert_eq!(seen.last(), Some(&1000));
    }

    #[test]
    fn second_backup_keeps_first_originals() {
        let target = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        write(target.path(), DATA, b"original");
        write(target.path(), ASSET, b"asset-v1");
        let vault = BackupVault::new(target.path(), store.path());
        vault.backup(&members(&[DATA]), &mut |_| {}).unwrap();

        // Simulate the install step writing the translated pair.
        write(target.path(), DATA, b"mtgapl:v3.1\n");
        write(target.path(), ASSET, b"asset-translated");
        let report = vault.backup(&members(&[DATA]), &mut |_| {}).unwrap();

        assert_eq!(report.skipped_translated, 1);
        assert_eq!(read(store.path(), DATA), b"original");
        assert_eq!(read(store.path(), ASSET), b"asset-v1");
    }

    #[test]
    fn restore_overwrites_and_merges() {
        let target = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        write(store.path(), DATA, b"original");
        write(target.path(), DATA, b"mtgapl:v3.1\n");
        write(target.path(), "MTGA_Data/Other/keep.bin", b"keep");

        let vault = BackupVault::new(target.path(), store.path());
        assert_eq!(vault.restore().unwrap(), 1);
        assert_eq!(read(target.path(), DATA), b"original");
        assert_eq!(read(target.path(), "MTGA_Data/Other/keep.bin"), b"keep");
        // Revert consumes but never deletes the store.
        assert_eq!(read(store.path(), DATA), b"original");
    }

    #[test]
    fn restore_without_store_is_backup_missing() {
        let target = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        let vault = BackupVault::new(target.path(), store.path());
        assert!(matches!(vault.restore(), Err(MtgaplError::BackupMissing(_))));
    }

    #[test]
    fn list_and_clear_store() {
        let target = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        write(store.path(), DATA, b"a");
        write(store.path(), ASSET, b"b");
        let vault = BackupVault::new(target.path(), store.path());

        let files = vault.backed_up_files().unwrap();
        assert_eq!(
            files,
            vec![
                entry_path(Path::new(""), ASSET),
                entry_path(Path::new(""), DATA)
            ]
        );
        assert_eq!(vault.clear().unwrap(), 2);
        assert!(!vault.backups_exist());
        assert_eq!(vault.clear().unwrap(), 0);
    }
}
