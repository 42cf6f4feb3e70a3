// mtgapl-common/src/model/mod.rs

pub mod layout;
pub mod release;

// Re-export
pub use layout::{is_data_file, paired_asset};
pub use release::{select_main_asset, Asset, ReleaseInfo};
