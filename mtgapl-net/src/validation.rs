// mtgapl-net/src/validation.rs
use mtgapl_common::error::{MtgaplError, Result};
use url::Url;

/// Validates a URL, ensuring it uses an HTTP(S) scheme and names a host.
pub fn validate_url(url_str: &str) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| MtgaplError::Validation(format!("Failed to parse URL '{url_str}': {e}")))?;
    match url.scheme() {
        "https" | "http" if url.host_str().is_some() => Ok(url),
        "https" | "http" => Err(MtgaplError::Validation(format!(
            "URL '{url_str}' has no host"
        ))),
        other => Err(MtgaplError::Validation(format!(
            "Invalid URL scheme for '{url_str}': Must be http(s), but got '{other}'"
        ))),
    }
}

/// Last path segment of a download URL, used when an asset has no usable name.
pub fn file_name_from_url(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
