// mtgapl-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod progress;

// Re-export key types
pub use config::Config;
pub use error::{MtgaplError, Result};
pub use model::{Asset, ReleaseInfo};
pub use pipeline::{InstallStage, ProgressReporter};
pub use progress::ProgressUnit;
