/*
File: mtgapl-core/src/fs.rs
Purpose: Copy primitives shared by the backup vault and the installer.
*/
use std::fs::{self, File};
use std::path::Path;

use mtgapl_common::error::{MtgaplError, Result};
use tracing::{debug, error, warn};
use walkdir::WalkDir;

/// Creates a directory and all its parent components if they are missing.
pub fn create_dir_all(path: &Path) -> Result<()> {
    debug!("Creating directory recursively: {}", path.display());
    fs::create_dir_all(path).map_err(|e| {
        error!("Failed create dir {}: {}", path.display(), e);
        MtgaplError::Filesystem(format!(
            "Failed to create directory {}: {}",
            path.display(),
            e
        ))
    })
}

/// Copies `src` over `dst`, following symlinks and keeping permissions and modification time.
pub fn copy_preserving(src: &Path, dst: &Path) -> Result<u64> {
    debug!("Copying {} -> {}", src.display(), dst.display());
    let bytes = fs::copy(src, dst).map_err(|e| {
        error!("Failed copy {} -> {}: {}", src.display(), dst.display(), e);
        MtgaplError::Filesystem(format!(
            "Failed to copy {} to {}: {}",
            src.display(),
            dst.display(),
            e
        ))
    })?;

    // fs::copy already carries the permission bits over.
    match fs::metadata(src).and_then(|m| m.modified()) {
        Ok(modified) => {
            let stamped = File::options()
                .write(true)
                .open(dst)
                .and_then(|f| f.set_modified(modified));
            if let Err(e) = stamped {
                warn!(
                    "Failed to preserve modification time on {}: {}",
                    dst.display(),
                    e
                );
            }
        }
        Err(e) => warn!("Could not read modification time of {}: {}", src.display(), e),
    }
    Ok(bytes)
}

/// Recursively copies `src_root` onto `dst_root`, merging into existing directories and
/// overwriting files. Returns the number of files copied.
pub fn copy_tree(src_root: &Path, dst_root: &Path) -> Result<usize> {
    debug!(
        "Copying tree {} -> {}",
        src_root.display(),
        dst_root.display()
    );
    let mut copied = 0;
    for entry in WalkDir::new(src_root).follow_links(true) {
        let entry = entry.map_err(|e| {
            MtgaplError::Filesystem(format!("Failed to walk {}: {}", src_root.display(), e))
        })?;
        let relative = entry.path().strip_prefix(src_root).map_err(|e| {
            MtgaplError::Filesystem(format!(
                "Unexpected path {} outside {}: {}",
                entry.path().display(),
                src_root.display(),
                e
            ))
        })?;
        let target = dst_root.join(relative);

        if entry.file_type().is_dir() {
            create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            if let Some(parent) = target.parent() {
                create_dir_all(parent)?;
            }
            copy_preserving(entry.path(), &target)?;
            copied += 1;
        } else {
            warn!("Skipping special file {}", entry.path().display());
        }
    }
    Ok(copied)
}
