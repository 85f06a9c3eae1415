//! Payment screenshot storage
//!
//! Accepts base64-encoded images, enforces the configured size cap and an
//! image-extension whitelist, and writes them under the upload directory
//! with randomized names. Returns the public URL path the frontend serves.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::settings::Settings;
use crate::utils::errors::{AvishkarError, Result};
use crate::utils::helpers;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

#[derive(Debug, Clone)]
pub struct UploadService {
    settings: Settings,
}

impl UploadService {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Decode and store a base64 image upload. Returns the public path
    /// under which the file is served.
    pub async fn store_image(&self, filename: &str, base64_data: &str) -> Result<String> {
        let extension = Self::extension_of(filename)?;

        // Data-URL prefixes from browser canvas exports are tolerated
        let raw = match base64_data.split_once(";base64,") {
            Some((_, data)) => data,
            None => base64_data,
        };

        let bytes = BASE64
            .decode(raw.trim())
            .map_err(|e| AvishkarError::InvalidInput(format!("invalid base64 payload: {}", e)))?;

        if bytes.is_empty() {
            return Err(AvishkarError::InvalidInput("empty upload".to_string()));
        }
        if bytes.len() > self.settings.uploads.max_size_bytes {
            warn!(size = bytes.len(), "Upload rejected, exceeds size cap");
            return Err(AvishkarError::InvalidInput(format!(
                "upload exceeds {} byte limit",
                self.settings.uploads.max_size_bytes
            )));
        }

        let stored_name = format!("{}.{}", helpers::generate_random_string(24), extension);
        let directory = PathBuf::from(&self.settings.uploads.directory);

        tokio::fs::create_dir_all(&directory)
            .await
            .map_err(AvishkarError::Io)?;
        tokio::fs::write(directory.join(&stored_name), &bytes)
            .await
            .map_err(AvishkarError::Io)?;

        let public_path = format!(
            "{}/{}",
            self.settings.uploads.public_base_path.trim_end_matches('/'),
            stored_name
        );

        info!(
            original = %helpers::sanitize_filename(filename),
            stored = %stored_name,
            size = bytes.len(),
            "Upload stored"
        );
        Ok(public_path)
    }

    fn extension_of(filename: &str) -> Result<String> {
        let sanitized = helpers::sanitize_filename(filename);
        let extension = sanitized
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AvishkarError::InvalidInput(format!(
                "unsupported file type: {:?}",
                extension
            )));
        }

        Ok(extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;

    fn service_with_dir(dir: &std::path::Path) -> UploadService {
        let mut settings = Settings::default();
        settings.uploads.directory = dir.to_string_lossy().to_string();
        settings.uploads.public_base_path = "/uploads".to_string();
        settings.uploads.max_size_bytes = 1024;
        UploadService::new(settings)
    }

    #[tokio::test]
    async fn test_store_and_serve_path() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_dir(dir.path());

        let data = STANDARD.encode(b"fake image bytes");
        let path = service.store_image("receipt.png", &data).await.unwrap();

        assert!(path.starts_with("/uploads/"));
        assert!(path.ends_with(".png"));

        let stored = dir.path().join(path.rsplit('/').next().unwrap());
        assert_eq!(std::fs::read(stored).unwrap(), b"fake image bytes");
    }

    #[tokio::test]
    async fn test_data_url_prefix_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_dir(dir.path());

        let data = format!("data:image/png;base64,{}", STANDARD.encode(b"pixels"));
        let path = service.store_image("shot.jpg", &data).await.unwrap();
        assert!(path.ends_with(".jpg"));
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_dir(dir.path());

        let data = STANDARD.encode(vec![0u8; 2048]);
        assert!(service.store_image("big.png", &data).await.is_err());
    }

    #[tokio::test]
    async fn test_disallowed_extension_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_dir(dir.path());

        let data = STANDARD.encode(b"#!/bin/sh");
        assert!(service.store_image("script.sh", &data).await.is_err());
    }

    #[tokio::test]
    async fn test_garbage_base64_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let service = service_with_dir(dir.path());

        assert!(service.store_image("x.png", "not base64 !!!").await.is_err());
    }
}
