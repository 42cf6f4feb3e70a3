use std::sync::Arc;

use thiserror::Error;

use crate::pipeline::InstallStage;

#[derive(Error, Debug, Clone)]
pub enum MtgaplError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<std::io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] Arc<serde_json::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Release index unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Release '{0}' has no installable (unlabeled) asset")]
    NoInstallableAsset(String),

    #[error("DownloadError: Failed to download '{0}' from '{1}': {2}")]
    DownloadFailed(String, String, String),

    #[error("Corrupt archive {0}: {1}")]
    CorruptArchive(String, String),

    #[error("Filesystem Error: {0}")]
    Filesystem(String),

    #[error("No backup of the original files found in {0}")]
    BackupMissing(String),

    #[error("Cannot locate a unique data_loc file in {0}: {1}")]
    AmbiguousOrMissingDataFile(String, String),

    #[error("{stage} failed: {source}")]
    StageFailed {
        stage: InstallStage,
        source: Box<MtgaplError>,
    },
}

impl MtgaplError {
    /// Wraps `self` with the pipeline stage it failed in.
    pub fn in_stage(self, stage: InstallStage) -> Self {
        MtgaplError::StageFailed {
            stage,
            source: Box::new(self),
        }
    }

    /// The underlying error with every stage wrapper peeled off.
    pub fn root_cause(&self) -> &MtgaplError {
        match self {
            MtgaplError::StageFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The stage the error was raised in, if it went through the installer.
    pub fn stage(&self) -> Option<InstallStage> {
        match self {
            MtgaplError::StageFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MtgaplError {
    fn from(err: std::io::Error) -> Self {
        MtgaplError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for MtgaplError {
    fn from(err: reqwest::Error) -> Self {
        MtgaplError::Http(Arc::new(err))
    }
}

impl From<serde_json::Error> for MtgaplError {
    fn from(err: serde_json::Error) -> Self {
        MtgaplError::Json(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, MtgaplError>;
