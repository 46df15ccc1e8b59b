//! Redirect-aware, atomic file downloads.

use std::path::Path;

use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{header, StatusCode};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::download::state::DownloadOutcome;
use crate::error::{Error, Result};
use crate::fs::paths::{ensure_dir, temp_path};
use crate::transport::Transport;

/// Minimum file size to show a progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Download `url` to `destination`. Never propagates an error: every
/// failure is logged and reported as [`DownloadOutcome::Failed`], and the
/// temp file is removed so no partially-written file ever occupies the
/// final path.
pub async fn download(
    transport: &Transport,
    url: &str,
    destination: &Path,
    show_progress: bool,
) -> DownloadOutcome {
    match try_download(transport, url, destination, show_progress).await {
        Ok(()) => {
            tracing::info!("Successfully downloaded: {}", file_label(destination));
            DownloadOutcome::Success
        }
        Err(e) => {
            let temp = temp_path(destination);
            if temp.exists() {
                let _ = tokio::fs::remove_file(&temp).await;
            }
            tracing::error!("Error downloading {}: {}", file_label(destination), e);
            DownloadOutcome::Failed(e.to_string())
        }
    }
}

async fn try_download(
    transport: &Transport,
    url: &str,
    destination: &Path,
    show_progress: bool,
) -> Result<()> {
    if let Some(parent) = destination.parent() {
        ensure_dir(parent).await?;
    }

    // Phase 1: probe without following redirects. The origin answers with
    // a 302 to a signed, time-limited download URL; its Location must be
    // captured here. Other statuses fall through with the original URL.
    let probe = transport.get_no_redirect(url).await?;
    let actual_url = if probe.status() == StatusCode::FOUND {
        probe
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::NoRedirectTarget(file_label(destination)))?
    } else {
        url.to_string()
    };

    // Phase 2: fetch the actual target, redirects followed.
    let response = transport.get(&actual_url).await?;
    if response.status() != StatusCode::OK {
        return Err(Error::Download(format!(
            "Failed to download {} (Status: {})",
            file_label(destination),
            response.status()
        )));
    }

    let progress = make_progress_bar(response.content_length(), show_progress);

    // Stream to the temp path; only a complete stream reaches the rename.
    let temp = temp_path(destination);
    let mut file = File::create(&temp).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
        if chunk.is_empty() {
            continue;
        }
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;

        if let Some(ref pb) = progress {
            pb.set_position(written);
        }
    }

    file.flush().await?;
    drop(file);

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    // Atomic replace. Callers pre-filter existing files, but an existing
    // destination is tolerated and overwritten.
    tokio::fs::rename(&temp, destination).await?;

    Ok(())
}

/// Progress bar for large downloads, when enabled.
fn make_progress_bar(content_length: Option<u64>, show_progress: bool) -> Option<ProgressBar> {
    let length = content_length?;
    if !show_progress || length <= PROGRESS_THRESHOLD {
        return None;
    }

    let pb = ProgressBar::new(length);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );
    Some(pb)
}

/// The destination's file name, for log lines.
fn file_label(destination: &Path) -> String {
    destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| destination.display().to_string())
}
