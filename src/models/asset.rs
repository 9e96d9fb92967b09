use std::path::PathBuf;

/// Result of materializing one [`ImageReference`](crate::models::job::ImageReference)
/// to local storage. Owned by the response being assembled; never retained
/// past the tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedAsset {
    /// 1-based, matches the remote output order.
    pub index: usize,
    pub filename: String,
    /// Present only when the save succeeded.
    pub local_path: Option<PathBuf>,
    /// URL or byte-handle identity of the source reference.
    pub source: String,
    pub saved: bool,
    pub error: Option<String>,
}

impl DownloadedAsset {
    pub fn saved(
        index: usize,
        filename: impl Into<String>,
        local_path: PathBuf,
        source: impl Into<String>,
    ) -> Self {
        DownloadedAsset {
            index,
            filename: filename.into(),
            local_path: Some(local_path),
            source: source.into(),
            saved: true,
            error: None,
        }
    }

    pub fn failed(
        index: usize,
        filename: impl Into<String>,
        source: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        DownloadedAsset {
            index,
            filename: filename.into(),
            local_path: None,
            source: source.into(),
            saved: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_asset_keeps_source() {
        let asset = DownloadedAsset::failed(2, "img.png", "https://cdn/x.png", "status 503");
        assert!(!asset.saved);
        assert!(asset.local_path.is_none());
        assert_eq!(asset.source, "https://cdn/x.png");
        assert_eq!(asset.error.as_deref(), Some("status 503"));
    }
}
