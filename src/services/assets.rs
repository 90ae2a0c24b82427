//! Assets embedded into generated documents as base64 `data:` URIs: the
//! Sarabun font faces, the optional college logo and the report photos.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures_util::{StreamExt, stream};
use reqwest::header::CONTENT_TYPE;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::RenderSettings;
use crate::services::url_normalizer::normalize_image_url;

/// Photos fetched at once while preparing one document.
const PHOTO_FETCH_CONCURRENCY: usize = 4;

/// Base64 TrueType data for both weights.
#[derive(Debug, Clone)]
pub struct FontFaces {
    pub regular: String,
    pub bold: String,
}

/// Everything the document assembler may embed.
#[derive(Debug, Clone, Default)]
pub struct DocumentAssets {
    /// `None` falls back to the system font stack
    pub fonts: Option<Arc<FontFaces>>,
    /// Logo as a `data:` URI
    pub logo: Option<String>,
}

/// Get content type for file extension.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ttf" => "font/ttf",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

/// Build a `data:` URI from raw bytes.
pub fn data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}

/// Extension of the last path segment of `url`, ignoring query and fragment.
fn url_extension(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rsplit_once('.') {
        Some((_, ext)) => ext,
        None => "",
    }
}

/// Fetches and caches document assets.
pub struct AssetLoader {
    http: reqwest::Client,
    regular_url: String,
    bold_url: String,
    font_timeout: Duration,
    inline_photos: bool,
    photo_timeout: Duration,
    logo_path: Option<PathBuf>,
    fonts: RwLock<Option<Arc<FontFaces>>>,
}

impl AssetLoader {
    pub fn new(settings: &RenderSettings) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(settings.font_timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client for fonts: {}", e);
                reqwest::Client::new()
            });

        Self {
            http,
            regular_url: settings.font_regular_url.clone(),
            bold_url: settings.font_bold_url.clone(),
            font_timeout: settings.font_timeout,
            inline_photos: settings.inline_photos,
            photo_timeout: settings.photo_timeout,
            logo_path: settings.logo_path.clone(),
            fonts: RwLock::new(None),
        }
    }

    /// Fonts and logo for one document. Never fails; anything missing is
    /// logged and left out.
    pub async fn load(&self) -> DocumentAssets {
        DocumentAssets {
            fonts: self.fonts().await,
            logo: match self.logo_path.as_deref() {
                Some(path) => load_logo(path).await,
                None => None,
            },
        }
    }

    async fn fonts(&self) -> Option<Arc<FontFaces>> {
        if let Some(fonts) = self.fonts.read().await.as_ref() {
            return Some(fonts.clone());
        }

        let fetch = async {
            tokio::join!(
                self.fetch_font(&self.regular_url),
                self.fetch_font(&self.bold_url)
            )
        };

        match tokio::time::timeout(self.font_timeout, fetch).await {
            Ok((Ok(regular), Ok(bold))) => {
                let faces = Arc::new(FontFaces { regular, bold });
                *self.fonts.write().await = Some(faces.clone());
                debug!("Embedded Sarabun fonts cached");
                Some(faces)
            }
            Ok((regular, bold)) => {
                let reason = regular.err().or(bold.err()).unwrap_or_default();
                warn!("Font download failed, using system fonts: {}", reason);
                None
            }
            Err(_) => {
                warn!(
                    "Font download exceeded {}s, using system fonts",
                    self.font_timeout.as_secs()
                );
                None
            }
        }
    }

    async fn fetch_font(&self, url: &str) -> Result<String, String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| format!("{}: {}", url, e))?;
        if !response.status().is_success() {
            return Err(format!("{}: HTTP {}", url, response.status()));
        }
        let bytes = response.bytes().await.map_err(|e| format!("{}: {}", url, e))?;
        Ok(STANDARD.encode(&bytes))
    }

    /// Replace every remote photo with an embedded `data:` URI so printing
    /// never waits on the network. Order is kept; a photo that cannot be
    /// fetched keeps its (normalized) URL.
    pub async fn inline_photos(&self, photos: &[String]) -> Vec<String> {
        if !self.inline_photos {
            return photos.to_vec();
        }

        let inlined: Vec<String> = stream::iter(photos)
            .map(|url| self.inline_photo(url))
            .buffered(PHOTO_FETCH_CONCURRENCY)
            .collect()
            .await;

        let embedded = inlined.iter().filter(|p| p.starts_with("data:")).count();
        debug!(embedded, total = photos.len(), "Photos prepared for printing");
        inlined
    }

    async fn inline_photo(&self, url: &str) -> String {
        let url = normalize_image_url(url);
        if url.is_empty() || url.starts_with("data:") {
            return url;
        }

        match tokio::time::timeout(self.photo_timeout, self.fetch_image(&url)).await {
            Ok(Ok(uri)) => uri,
            Ok(Err(reason)) => {
                warn!("Photo not embedded, printing by URL: {}", reason);
                url
            }
            Err(_) => {
                warn!(
                    "Photo fetch exceeded {}ms, printing by URL: {}",
                    self.photo_timeout.as_millis(),
                    url
                );
                url
            }
        }
    }

    async fn fetch_image(&self, url: &str) -> Result<String, String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| format!("{}: {}", url, e))?;
        if !response.status().is_success() {
            return Err(format!("{}: HTTP {}", url, response.status()));
        }

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_lowercase());
        let content_type = match declared {
            Some(ct) if ct.starts_with("image/") => ct,
            Some(ct) => return Err(format!("{}: not an image ({})", url, ct)),
            None => content_type_for_extension(url_extension(url)).to_string(),
        };

        let bytes = response.bytes().await.map_err(|e| format!("{}: {}", url, e))?;
        Ok(data_uri(&content_type, &bytes))
    }
}

async fn load_logo(path: &Path) -> Option<String> {
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            Some(data_uri(content_type_for_extension(ext), &bytes))
        }
        Err(e) => {
            warn!("Failed to read logo {}: {}", path.display(), e);
            None
        }
    }
}
