use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;

use crate::models::{DownloadedAsset, ImageReference};

/// Every saved image carries the generating model in its name.
const FILENAME_PREFIX: &str = "minimax_image_01";
pub const IMAGE_FILE_EXT: &str = "png";

/// Maximum length of the prompt-derived filename segment.
const MAX_PROMPT_SEGMENT: usize = 50;

/// Derive a filesystem-safe filename from the prompt and the 1-based image
/// index. The timestamp is the sole collision-avoidance mechanism: the same
/// prompt and index at different instants yield different names.
pub fn derive_filename(prompt: &str, index: usize) -> String {
    let safe: String = prompt
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();
    let safe = safe.split_whitespace().collect::<Vec<_>>().join("_");
    let safe: String = safe.chars().take(MAX_PROMPT_SEGMENT).collect();

    let timestamp = Utc::now()
        .to_rfc3339()
        .replace(':', "-")
        .replace('.', "-");

    format!(
        "{}_{}_{}_{}.{}",
        FILENAME_PREFIX, safe, index, timestamp, IMAGE_FILE_EXT
    )
}

/// Writes image references to local storage. Failures never cross this
/// boundary as errors: a failed save must not mask a successful remote
/// generation, so every outcome is a [`DownloadedAsset`].
#[derive(Clone, Default)]
pub struct AssetDownloader {
    client: Client,
}

impl AssetDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize one reference into `dir` under `filename`. Creates the
    /// directory if absent; concurrent creators must not trip each other.
    /// Partial files are removed on failure.
    pub async fn materialize(
        &self,
        index: usize,
        reference: &ImageReference,
        dir: &Path,
        filename: &str,
    ) -> DownloadedAsset {
        let source = reference.source().to_string();

        // create_dir_all succeeds when the directory already exists, which
        // also covers two downloads racing to create it.
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            log::warn!("Could not create output directory {}: {}", dir.display(), e);
            return DownloadedAsset::failed(
                index,
                filename,
                source,
                format!("failed to create {}: {}", dir.display(), e),
            );
        }

        let path = dir.join(filename);
        let bytes = match reference {
            ImageReference::Url(url) => match self.fetch(url).await {
                Ok(bytes) => bytes,
                Err(message) => {
                    log::warn!("Download of {} failed: {}", url, message);
                    return DownloadedAsset::failed(index, filename, source, message);
                }
            },
            ImageReference::Bytes { data, .. } => data.clone(),
        };

        if let Err(e) = tokio::fs::write(&path, &bytes).await {
            let _ = tokio::fs::remove_file(&path).await;
            log::warn!("Write of {} failed: {}", path.display(), e);
            return DownloadedAsset::failed(
                index,
                filename,
                source,
                format!("failed to write {}: {}", path.display(), e),
            );
        }

        let path = absolute(path);
        log::debug!("Saved image {} to {}", index, path.display());
        DownloadedAsset::saved(index, filename, path, source)
    }

    /// Materialize every reference of one response, sequentially in output
    /// order, deriving each filename from the prompt. Waits for all saves
    /// (success or failure) before returning.
    pub async fn materialize_all(
        &self,
        prompt: &str,
        references: &[ImageReference],
        dir: &Path,
    ) -> Vec<DownloadedAsset> {
        let mut assets = Vec::with_capacity(references.len());
        for (i, reference) in references.iter().enumerate() {
            let index = i + 1;
            let filename = derive_filename(prompt, index);
            assets.push(self.materialize(index, reference, dir, &filename).await);
        }
        assets
    }

    async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("unexpected status {}", status));
        }

        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| format!("body read failed: {}", e))
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    path.canonicalize().unwrap_or(path)
}
