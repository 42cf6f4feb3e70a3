// mtgapl-net/src/lib.rs
pub mod http;
pub mod validation;

// Re-export the public fetching functions
pub use http::{build_http_client, check_latest_version, fetch_asset, fetch_release_info};
pub use mtgapl_common::{
    error::{MtgaplError, Result},
    model::{Asset, ReleaseInfo},
    Config,
};
pub use reqwest::Client;
pub use validation::validate_url;
