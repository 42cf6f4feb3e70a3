// mtgapl-common/src/model/release.rs
use serde::{Deserialize, Serialize};

use crate::error::{MtgaplError, Result};

/// One published release as returned by the release index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseInfo {
    #[serde(rename = "tag_name")]
    pub tag: String,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
    /// Labeled assets are extras (readmes, screenshots); the package itself has none.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

impl ReleaseInfo {
    pub fn main_asset(&self) -> Result<&Asset> {
        select_main_asset(&self.tag, &self.assets)
    }
}

/// Picks the first asset without a label.
pub fn select_main_asset<'a>(tag: &str, assets: &'a [Asset]) -> Result<&'a Asset> {
    assets
        .iter()
        .find(|asset| asset.label.is_none())
        .ok_or_else(|| MtgaplError::NoInstallableAsset(tag.to_string()))
}
