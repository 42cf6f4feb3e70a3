// Path: mtgapl-core/src/install/extract.rs
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use mtgapl_common::error::{MtgaplError, Result};
use mtgapl_common::progress::{ProgressFn, ProgressUnit};
use tracing::{debug, error};
use zip::read::ZipArchive;

use crate::fs::create_dir_all;

/// Extracts every entry of the zip at `archive_path` next to the archive itself.
///
/// Returns the extraction root together with the `/`-separated relative paths of the
/// regular files that were written. Directory entries are created on disk but are not
/// part of the returned list.
pub fn extract_archive(
    archive_path: &Path,
    on_progress: &mut ProgressFn<'_>,
) -> Result<(PathBuf, Vec<String>)> {
    let target_dir = archive_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let archive_name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| archive_path.display().to_string());

    let file = File::open(archive_path).map_err(|e| {
        MtgaplError::Filesystem(format!(
            "Failed to open archive {}: {}",
            archive_path.display(),
            e
        ))
    })?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| {
        error!("Failed to open ZIP {}: {}", archive_path.display(), e);
        MtgaplError::CorruptArchive(archive_name.clone(), e.to_string())
    })?;

    let total = archive.len();
    debug!(
        "Extracting {} entries from {} into {}",
        total,
        archive_path.display(),
        target_dir.display()
    );
    on_progress(ProgressUnit::ZERO);

    let mut members = Vec::with_capacity(total);
    for i in 0..total {
        let mut entry = archive.by_index(i).map_err(|e| {
            MtgaplError::CorruptArchive(
                archive_name.clone(),
                format!("error reading entry {i}: {e}"),
            )
        })?;

        let relative = sanitize_member_path(entry.name())
            .ok_or_else(|| {
                error!("Unsafe ZIP entry name {:?} in {}", entry.name(), archive_name);
                MtgaplError::CorruptArchive(
                    archive_name.clone(),
                    format!("unsafe member path {:?}", entry.name()),
                )
            })?;
        let out_path = target_dir.join(&relative);
        if !out_path.starts_with(&target_dir) {
            return Err(MtgaplError::CorruptArchive(
                archive_name.clone(),
                format!("member {:?} escapes the extraction root", entry.name()),
            ));
        }
        if out_path == archive_path {
            return Err(MtgaplError::CorruptArchive(
                archive_name.clone(),
                format!("member {:?} would overwrite the archive itself", entry.name()),
            ));
        }

        if entry.is_dir() {
            create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                create_dir_all(parent)?;
            }
            let mut out = File::create(&out_path).map_err(|e| {
                MtgaplError::Filesystem(format!("Failed to create {}: {}", out_path.display(), e))
            })?;
            io::copy(&mut entry, &mut out).map_err(|e| match e.kind() {
                io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
                    MtgaplError::CorruptArchive(
                        archive_name.clone(),
                        format!("{}: {}", entry.name(), e),
                    )
                }
                _ => MtgaplError::Filesystem(format!(
                    "Failed to write {}: {}",
                    out_path.display(),
                    e
                )),
            })?;

            #[cfg(unix)]
            if let Some(mode) = entry.unix_mode() {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(&out_path, fs::Permissions::from_mode(mode)) {
                    debug!("Could not set mode {:o} on {}: {}", mode, out_path.display(), e);
                }
            }

            members.push(to_member_string(&relative));
        }

        on_progress(ProgressUnit::ratio((i + 1) as u64, total as u64));
    }

    // An empty archive never reaches the loop body.
    on_progress(ProgressUnit::DONE);
    debug!("Extracted {} files from {}", members.len(), archive_name);
    Ok((target_dir, members))
}

/// Accepts only plain relative paths: normal components and `.` segments.
fn sanitize_member_path(name: &str) -> Option<PathBuf> {
    if name.contains('\\') || name.contains('\0') {
        return None;
    }
    let mut clean = PathBuf::new();
    for comp in Path::new(name).components() {
        match comp {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

fn to_member_string(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
