// mtgapl-common/src/model/layout.rs
//! Fixed names describing the MTG Arena installation and the translation package.

use std::path::{Path, PathBuf};

/// Top-level game data directory, mirrored as-is into the backup store.
pub const GAME_DATA_DIR: &str = "MTGA_Data";
/// Presence of this subtree in the backup store means backups exist.
pub const BACKUP_SENTINEL_DIR: &str = "MTGA_Data/Downloads";
/// Directory holding the localisation data files.
pub const LOC_DATA_DIR: &str = "MTGA_Data/Downloads/Data";

/// Suffix of companion data files; `X.dat` always travels with `X`.
pub const DATA_FILE_SUFFIX: &str = ".dat";
/// Name prefix and extension of the file carrying the installed version line.
pub const DATA_LOC_PREFIX: &str = "data_loc";
pub const DATA_LOC_EXTENSION: &str = "dat";

/// Substring written into every patched data file.
pub const TRANSLATION_MARKER: &str = "mtgapl";
/// Prefix of the version line inside the data_loc file.
pub const VERSION_LINE_PREFIX: &str = "mtgapl:";

pub fn is_data_file(entry: &str) -> bool {
    entry.ends_with(DATA_FILE_SUFFIX)
}

/// `foo/bar.dat` -> `foo/bar`. Entries without the suffix come back unchanged.
pub fn paired_asset(entry: &str) -> &str {
    entry.strip_suffix(DATA_FILE_SUFFIX).unwrap_or(entry)
}

pub fn is_data_loc_file(file_name: &str) -> bool {
    file_name.starts_with(DATA_LOC_PREFIX) && file_name.ends_with(DATA_LOC_EXTENSION)
}

/// Joins a `/`-separated archive entry onto `root`.
pub fn entry_path(root: &Path, entry: &str) -> PathBuf {
    entry
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}
