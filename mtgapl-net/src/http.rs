use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use mtgapl_common::error::{MtgaplError, Result};
use mtgapl_common::model::ReleaseInfo;
use mtgapl_common::progress::{ProgressFn, ProgressUnit};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use tokio::fs::{self, File as TokioFile};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::validation::{file_name_from_url, validate_url};

const DOWNLOAD_TIMEOUT_SECS: u64 = 300;
const CONNECT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT_STRING: &str = "mtgapl installer (Rust; +https://mtgpopolsku.pl)";
const GITHUB_JSON: &str = "application/vnd.github+json";

pub fn build_http_client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| MtgaplError::Config(format!("Failed to build HTTP client: {e}")))
}

/// Fetches and parses the latest release from the release index.
pub async fn fetch_release_info(client: &Client, index_url: &str) -> Result<ReleaseInfo> {
    validate_url(index_url)?;
    debug!("Fetching release index: {}", index_url);

    let response = client
        .get(index_url)
        .header(ACCEPT, GITHUB_JSON)
        .send()
        .await
        .map_err(|e| {
            debug!("HTTP request failed for {index_url}: {e}");
            MtgaplError::RemoteUnavailable(format!("request to {index_url} failed: {e}"))
        })?;
    let status = response.status();
    debug!("Received HTTP status: {} for {}", status, index_url);

    if !status.is_success() {
        error!("Release index returned HTTP {} ({})", status, index_url);
        return Err(MtgaplError::RemoteUnavailable(format!(
            "HTTP {status} from {index_url}"
        )));
    }

    let body = response.bytes().await.map_err(|e| {
        MtgaplError::RemoteUnavailable(format!("failed to read body from {index_url}: {e}"))
    })?;
    let release: ReleaseInfo = serde_json::from_slice(&body)?;
    debug!(
        "Latest release is {} with {} asset(s)",
        release.tag,
        release.assets.len()
    );
    Ok(release)
}

/// Returns only the tag of the latest release.
pub async fn check_latest_version(client: &Client, index_url: &str) -> Result<String> {
    fetch_release_info(client, index_url)
        .await
        .map(|release| release.tag)
}

/// Streams `url` into `dest_dir/file_name`, reporting permille progress after every chunk.
///
/// Without a `Content-Length` the body is written in one go and progress jumps straight to
/// 1000. The last update is always 1000. A partial file is left behind on failure.
pub async fn fetch_asset(
    client: &Client,
    url: &str,
    dest_dir: &Path,
    file_name: &str,
    on_progress: &mut ProgressFn<'_>,
) -> Result<PathBuf> {
    let parsed = validate_url(url)?;
    let file_name = resolve_file_name(file_name, &parsed)?;
    let dest_path = dest_dir.join(&file_name);
    let fail = |reason: String| MtgaplError::DownloadFailed(file_name.clone(), url.to_string(), reason);

    debug!("Downloading {} to {}", url, dest_path.display());
    on_progress(ProgressUnit::ZERO);

    fs::create_dir_all(dest_dir).await.map_err(|e| {
        fail(format!(
            "failed to create download directory {}: {e}",
            dest_dir.display()
        ))
    })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fail(format!("HTTP request failed: {e}")))?;
    let status = response.status();
    debug!("Received HTTP status: {} for {}", status, url);
    if !status.is_success() {
        error!("HTTP error {} for URL {}", status, url);
        return Err(fail(format!("HTTP {status}")));
    }

    let mut out = TokioFile::create(&dest_path).await.map_err(|e| {
        fail(format!(
            "failed to create {}: {e}",
            dest_path.display()
        ))
    })?;

    match response.content_length().filter(|len| *len > 0) {
        Some(total) => {
            let mut written: u64 = 0;
            let mut stream = response.bytes_stream();
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|e| fail(format!("failed reading body: {e}")))?;
                out.write_all(&chunk)
                    .await
                    .map_err(|e| fail(format!("failed writing {}: {e}", dest_path.display())))?;
                written += chunk.len() as u64;
                on_progress(ProgressUnit::ratio(written, total));
            }
            debug!("Wrote {} of {} announced bytes", written, total);
        }
        None => {
            debug!("No content length for {}, reading body in one shot", url);
            let body = response
                .bytes()
                .await
                .map_err(|e| fail(format!("failed reading body: {e}")))?;
            out.write_all(&body)
                .await
                .map_err(|e| fail(format!("failed writing {}: {e}", dest_path.display())))?;
        }
    }

    out.flush()
        .await
        .map_err(|e| fail(format!("failed flushing {}: {e}", dest_path.display())))?;
    drop(out);

    on_progress(ProgressUnit::DONE);
    debug!("Download finished: {}", dest_path.display());
    Ok(dest_path)
}

fn resolve_file_name(file_name: &str, url: &url::Url) -> Result<String> {
    let candidate = if file_name.is_empty() {
        file_name_from_url(url).unwrap_or_else(|| "package.zip".to_string())
    } else {
        file_name.to_string()
    };
    // Asset names come from the index; never let one point outside the scratch dir.
    let is_plain = Path::new(&candidate)
        .file_name()
        .is_some_and(|name| name == candidate.as_str());
    if is_plain {
        Ok(candidate)
    } else {
        Err(MtgaplError::Validation(format!(
            "Refusing to download to non-plain file name '{candidate}'"
        )))
    }
}
