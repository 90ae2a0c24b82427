//! Photo upload client for the Apps Script endpoint that stores files in
//! Google Drive.
//!
//! The endpoint takes a form-encoded body `{ file: <base64>, fileName,
//! mimeType }` and answers `{ success, url?, error? }`. Upload failures are
//! never fatal: they are logged and the file is skipped.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;
use tracing::{debug, error, warn};

/// HTTP connect timeout for the upload endpoint.
const UPLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Apps Script can be slow on cold start.
const UPLOAD_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// One file received from the client.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    url: Option<String>,
    error: Option<String>,
}

/// Client for the upload endpoint.
#[derive(Clone)]
pub struct UploadClient {
    endpoint: Option<String>,
    http: reqwest::Client,
}

impl UploadClient {
    /// `None` endpoint: every upload is skipped.
    pub fn new(endpoint: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(UPLOAD_CONNECT_TIMEOUT)
            .timeout(UPLOAD_REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client for uploads: {}", e);
                reqwest::Client::new()
            });
        Self { endpoint, http }
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Upload one file. Returns the hosted URL, or `None` on any failure.
    pub async fn upload_file(&self, data: &[u8], file_name: &str, mime_type: &str) -> Option<String> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            warn!("Upload endpoint not configured, skipping {}", file_name);
            return None;
        };

        let body = format!(
            "file={}&fileName={}&mimeType={}",
            urlencoding::encode(&STANDARD.encode(data)),
            urlencoding::encode(file_name),
            urlencoding::encode(mime_type)
        );

        let response = match self
            .http
            .post(endpoint)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Upload of {} failed: {}", file_name, e);
                return None;
            }
        };

        if !response.status().is_success() {
            error!(
                "Upload of {} failed: HTTP {}",
                file_name,
                response.status()
            );
            return None;
        }

        match response.json::<UploadResponse>().await {
            Ok(UploadResponse {
                success: true,
                url: Some(url),
                ..
            }) if !url.trim().is_empty() => {
                debug!("Uploaded {} ({} bytes) -> {}", file_name, data.len(), url);
                Some(url)
            }
            Ok(result) => {
                error!(
                    "Upload of {} rejected: {}",
                    file_name,
                    result.error.as_deref().unwrap_or("Unknown error")
                );
                None
            }
            Err(e) => {
                error!("Upload of {} returned an unreadable response: {}", file_name, e);
                None
            }
        }
    }

    /// Upload files one after another. Failed files are skipped; the URLs
    /// that come back keep the input order.
    pub async fn upload_batch(&self, files: &[UploadFile]) -> Vec<String> {
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            if let Some(url) = self
                .upload_file(&file.data, &file.file_name, &file.mime_type)
                .await
            {
                urls.push(url);
            }
        }
        urls
    }
}

/// Name a photo the way the Drive folder expects: `{prefix}_{index}.{ext}`,
/// keeping the original extension. Without a prefix the name is kept.
pub fn prefixed_file_name(prefix: Option<&str>, index: usize, original: &str) -> String {
    match prefix.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefix) => {
            let ext = std::path::Path::new(original)
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("jpg");
            format!("{}_{}.{}", prefix, index + 1, ext)
        }
        None => original.to_string(),
    }
}
