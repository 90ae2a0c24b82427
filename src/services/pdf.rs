//! PDF pipeline: load assets, assemble the document, render it.

use std::sync::Arc;

use tracing::info;

use crate::error::AppResult;
use crate::models::{PdfData, PdfMode};
use crate::services::assets::AssetLoader;
use crate::services::document::assemble_document;
use crate::services::renderer::PdfRenderer;

/// A rendered PDF.
#[derive(Debug)]
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

#[derive(Clone)]
pub struct PdfService {
    assets: Arc<AssetLoader>,
    renderer: PdfRenderer,
}

impl PdfService {
    pub fn new(assets: Arc<AssetLoader>, renderer: PdfRenderer) -> Self {
        Self { assets, renderer }
    }

    pub async fn generate(&self, mode: PdfMode, data: &PdfData) -> AppResult<GeneratedPdf> {
        let (assets, photos) = if mode.prints_photos() && !data.photos.is_empty() {
            let (assets, photos) =
                tokio::join!(self.assets.load(), self.assets.inline_photos(&data.photos));
            (assets, Some(photos))
        } else {
            (self.assets.load().await, None)
        };

        let inlined;
        let data = match photos {
            Some(photos) => {
                inlined = PdfData {
                    photos,
                    ..data.clone()
                };
                &inlined
            }
            None => data,
        };
        let document = assemble_document(mode, data, &assets)?;

        info!(
            mode = %mode,
            pages = document.page_count,
            reports = data.reports.len(),
            photos = data.photos.len(),
            "Rendering homeroom document"
        );

        let bytes = self.renderer.render(&document.html).await?;
        Ok(GeneratedPdf {
            bytes,
            file_name: format!("homeroom-{}.pdf", mode),
        })
    }
}
