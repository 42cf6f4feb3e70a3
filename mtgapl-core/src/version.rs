// mtgapl-core/src/version.rs
//! Latest-vs-installed version lookup.

use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use mtgapl_common::config::Config;
use mtgapl_common::error::{MtgaplError, Result};
use mtgapl_common::model::layout::{is_data_loc_file, LOC_DATA_DIR, TRANSLATION_MARKER, VERSION_LINE_PREFIX};
use mtgapl_common::model::ReleaseInfo;
use mtgapl_net::http;
use reqwest::Client;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionStatus {
    pub installed: Option<String>,
    pub latest: String,
}

impl VersionStatus {
    /// Nothing installed, or an installed tag different from the published one.
    pub fn update_available(&self) -> bool {
        self.installed.as_deref() != Some(self.latest.as_str())
    }
}

pub struct VersionOracle {
    client: Client,
    index_url: String,
}

impl VersionOracle {
    pub fn new(client: Client, index_url: impl Into<String>) -> Self {
        Self {
            client,
            index_url: index_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            http::build_http_client()?,
            config.release_index_url.clone(),
        ))
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    pub async fn check_latest_version(&self) -> Result<String> {
        http::check_latest_version(&self.client, &self.index_url).await
    }

    pub async fn latest_release(&self) -> Result<ReleaseInfo> {
        http::fetch_release_info(&self.client, &self.index_url).await
    }

    pub fn installed_version(&self, install_root: Option<&Path>) -> Result<Option<String>> {
        installed_version(install_root)
    }

    pub async fn version_status(&self, install_root: Option<&Path>) -> Result<VersionStatus> {
        let installed = installed_version(install_root)?;
        let latest = self.check_latest_version().await?;
        Ok(VersionStatus { installed, latest })
    }
}

/// Reads the translation version recorded in the installed data_loc file.
///
/// `None` when the root is unset or missing, when the data directory does not exist yet,
/// or when the data_loc file carries no version line.
pub fn installed_version(install_root: Option<&Path>) -> Result<Option<String>> {
    let Some(root) = install_root.filter(|r| !r.as_os_str().is_empty()) else {
        return Ok(None);
    };
    if !root.exists() {
        debug!("Install root {} does not exist", root.display());
        return Ok(None);
    }
    let data_dir = root.join(LOC_DATA_DIR);
    if !data_dir.is_dir() {
        debug!("No data directory at {}", data_dir.display());
        return Ok(None);
    }

    let data_loc = locate_data_loc_file(&data_dir)?;
    read_version_marker(&data_loc)
}

/// Finds the single `data_loc*dat` file in `dir`. Zero or several matches is an error.
pub fn locate_data_loc_file(dir: &Path) -> Result<PathBuf> {
    let entries = fs::read_dir(dir).map_err(|e| {
        MtgaplError::Filesystem(format!("Failed to read {}: {}", dir.display(), e))
    })?;

    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                let name = entry.file_name();
                if is_data_loc_file(&name.to_string_lossy()) {
                    matches.push(entry.path());
                }
            }
            Err(e) => warn!("Error reading entry in {}: {}", dir.display(), e),
        }
    }

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(MtgaplError::AmbiguousOrMissingDataFile(
            dir.display().to_string(),
            "no data_loc file found".to_string(),
        )),
        n => {
            matches.sort();
            let names: Vec<String> = matches
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect();
            Err(MtgaplError::AmbiguousOrMissingDataFile(
                dir.display().to_string(),
                format!("{n} candidates: {}", names.join(", ")),
            ))
        }
    }
}

fn read_version_marker(path: &Path) -> Result<Option<String>> {
    debug!("Reading version marker from {}", path.display());
    let file = File::open(path).map_err(|e| {
        MtgaplError::Filesystem(format!("Failed to open {}: {}", path.display(), e))
    })?;

    // Data files are not guaranteed to be valid UTF-8 outside the marker line.
    for line in BufReader::new(file).split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        let line = line.trim();
        if line.starts_with(TRANSLATION_MARKER) {
            let version = line.strip_prefix(VERSION_LINE_PREFIX).unwrap_or(line).trim();
            return Ok(Some(version.to_string()));
        }
    }
    Ok(None)
}
