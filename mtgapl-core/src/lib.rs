// mtgapl-core/src/lib.rs

pub mod backup;
pub mod fs;
pub mod install;
pub mod version;

// Re-export key types for easier use by the CLI crate
pub use backup::{BackupReport, BackupVault};
pub use install::{copy_new_files, extract_archive, InstallOutcome, Installer};
pub use mtgapl_common::pipeline::{InstallStage, NoopReporter, ProgressReporter};
pub use version::{installed_version, VersionOracle, VersionStatus};
