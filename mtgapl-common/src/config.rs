// mtgapl-common/src/config.rs
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::error::{MtgaplError, Result};

// Used as the install root when nothing is configured and the directory exists.
const DEFAULT_MTGA_PATH: &str = "C:/Program Files/Wizards of the Coast/MTGA/";
pub const DEFAULT_RELEASE_INDEX_URL: &str =
    "https://api.github.com/repos/dekoza/mtgpl/releases/latest";

const APP_ORGANIZATION: &str = "mtgpopolsku";
const APP_NAME: &str = "pl.mtgpopolsku.app";
const SETTINGS_FILENAME: &str = "settings.json";

const ENV_MTGA_PATH: &str = "MTGAPL_MTGA_PATH";
const ENV_BACKUP_PATH: &str = "MTGAPL_BACKUP_PATH";
const ENV_RELEASE_URL: &str = "MTGAPL_RELEASE_URL";

/// The persisted user settings. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub mtga_path: String,
    #[serde(default)]
    pub backup_path: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub install_root: Option<PathBuf>,
    pub backup_root: PathBuf,
    pub release_index_url: String,
    pub data_dir: PathBuf,
    pub config_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading mtgapl configuration");

        let dirs = ProjectDirs::from("", APP_ORGANIZATION, APP_NAME).ok_or_else(|| {
            MtgaplError::Config("Could not determine the per-user data directory".to_string())
        })?;

        Self::load_from_dirs(dirs.data_dir(), dirs.config_dir())
    }

    /// Loads settings from `config_dir`, with defaults rooted at `data_dir`, then applies
    /// environment overrides.
    pub fn load_from_dirs(data_dir: &Path, config_dir: &Path) -> Result<Self> {
        let settings_path = config_dir.join(SETTINGS_FILENAME);
        let settings = read_settings(&settings_path)?;

        let install_root = env::var(ENV_MTGA_PATH)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(settings.mtga_path.clone()).filter(|s| !s.is_empty()))
            .map(PathBuf::from)
            .or_else(|| {
                let default_path = PathBuf::from(DEFAULT_MTGA_PATH);
                if default_path.exists() {
                    debug!("Using default MTGA path: {}", default_path.display());
                    Some(default_path)
                } else {
                    None
                }
            });

        let backup_root = env::var(ENV_BACKUP_PATH)
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(settings.backup_path.clone()).filter(|s| !s.is_empty()))
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.to_path_buf());

        let release_index_url = env::var(ENV_RELEASE_URL)
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_RELEASE_INDEX_URL.to_string());

        match &install_root {
            Some(root) => debug!("Effective MTGA path set to: {}", root.display()),
            None => debug!("MTGA path is not configured"),
        }
        debug!("Effective backup path set to: {}", backup_root.display());

        debug!("Configuration loaded successfully.");
        Ok(Self {
            install_root,
            backup_root,
            release_index_url,
            data_dir: data_dir.to_path_buf(),
            config_dir: config_dir.to_path_buf(),
        })
    }

    /// A configuration with explicit roots and nothing read from disk or the environment.
    pub fn with_paths(install_root: impl Into<PathBuf>, backup_root: impl Into<PathBuf>) -> Self {
        let backup_root = backup_root.into();
        Self {
            install_root: Some(install_root.into()),
            data_dir: backup_root.clone(),
            config_dir: backup_root.clone(),
            backup_root,
            release_index_url: DEFAULT_RELEASE_INDEX_URL.to_string(),
        }
    }

    pub fn release_index_url(mut self, url: impl Into<String>) -> Self {
        self.release_index_url = url.into();
        self
    }

    pub fn install_root(&self) -> Option<&Path> {
        self.install_root
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// The install root, or a configuration error telling the user to set it.
    pub fn require_install_root(&self) -> Result<&Path> {
        self.install_root().ok_or_else(|| {
            MtgaplError::Config(
                "MTGA folder is not set (use `mtgapl config set-path <dir>`)".to_string(),
            )
        })
    }

    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join(SETTINGS_FILENAME)
    }

    pub fn settings(&self) -> Settings {
        Settings {
            mtga_path: self
                .install_root()
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_default(),
            backup_path: self.backup_root.to_string_lossy().into_owned(),
        }
    }

    /// Persists the current install and backup roots.
    pub fn save(&self) -> Result<()> {
        let path = self.settings_path();
        debug!("Saving settings to {}", path.display());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(&self.settings())?;
        fs::write(&path, json)?;
        Ok(())
    }
}

fn read_settings(path: &Path) -> Result<Settings> {
    if !path.is_file() {
        debug!("No settings file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }
    let bytes = fs::read(path)?;
    match serde_json::from_slice(&bytes) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            warn!(
                "Ignoring unreadable settings file {}: {}",
                path.display(),
                e
            );
            Ok(Settings::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_round_trips_paths() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let config_dir = dir.path().join("config");

        let mut config = Config::load_from_dirs(&data_dir, &config_dir).unwrap();
        config.install_root = Some(dir.path().join("MTGA"));
        config.backup_root = dir.path().join("backups");
        config.save().unwrap();

        let reloaded = Config::load_from_dirs(&data_dir, &config_dir).unwrap();
        if env::var(ENV_MTGA_PATH).is_err() {
            assert_eq!(reloaded.install_root(), Some(dir.path().join("MTGA").as_path()));
        }
        if env::var(ENV_BACKUP_PATH).is_err() {
            assert_eq!(reloaded.backup_root(), dir.path().join("backups"));
        }
    }

    #[test]
    fn backup_root_defaults_to_data_dir() {
        if env::var(ENV_BACKUP_PATH).is_ok() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_dirs(dir.path(), dir.path()).unwrap();
        assert_eq!(config.backup_root(), dir.path());
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILENAME), b"{not json").unwrap();
        assert!(Config::load_from_dirs(dir.path(), dir.path()).is_ok());
    }

    #[test]
    fn empty_install_root_is_rejected() {
        let mut config = Config::with_paths("", "/tmp/backups");
        assert!(config.install_root().is_none());
        assert!(matches!(
            config.require_install_root(),
            Err(MtgaplError::Config(_))
        ));

        config.install_root = Some(PathBuf::from("/games/mtga"));
        assert_eq!(config.require_install_root().unwrap(), Path::new("/games/mtga"));
    }
}
