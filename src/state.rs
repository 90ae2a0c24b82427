//! Shared application state registered with every worker.

use std::sync::Arc;

use actix_web::web;

use crate::api::{self, MaxUploadSize};
use crate::config::Config;
use crate::services::{
    AssetLoader, ChromeEngine, PdfEngine, PdfRenderer, PdfService, ReportService, UploadClient,
};
use crate::store::RecordStore;

/// Services shared across workers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub reports: ReportService,
    pub pdf: PdfService,
    pub uploads: UploadClient,
    pub max_upload_size: usize,
}

impl AppState {
    /// Wire the production services from configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(RecordStore::new(config.sheets.clone()));
        let engine: Arc<dyn PdfEngine> = Arc::new(ChromeEngine::from_settings(&config.render));

        Self::new(
            store,
            engine,
            AssetLoader::new(&config.render),
            UploadClient::new(config.upload_url.clone()),
            config.max_upload_size,
        )
    }

    pub fn new(
        store: Arc<RecordStore>,
        engine: Arc<dyn PdfEngine>,
        assets: AssetLoader,
        uploads: UploadClient,
        max_upload_size: usize,
    ) -> Self {
        Self {
            reports: ReportService::new(store.clone()),
            pdf: PdfService::new(Arc::new(assets), PdfRenderer::new(engine)),
            store,
            uploads,
            max_upload_size,
        }
    }

    /// Register app data and mount the `/api/v1` scope.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::from(self.store.clone()))
            .app_data(web::Data::new(self.reports.clone()))
            .app_data(web::Data::new(self.pdf.clone()))
            .app_data(web::Data::new(self.uploads.clone()))
            .app_data(web::Data::new(MaxUploadSize(self.max_upload_size)))
            .app_data(api::json_config(self.max_upload_size))
            .app_data(api::query_config())
            .service(web::scope("/api/v1").configure(api::configure_api));
    }
}
