//! API endpoint modules.

pub mod advisors;
pub mod health;
pub mod openapi;
pub mod pdf;
pub mod reports;
pub mod uploads;

use actix_web::web;

use crate::error::AppError;

pub use advisors::configure_advisor_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use pdf::configure_pdf_routes;
pub use reports::configure_report_routes;
pub use uploads::{MaxUploadSize, configure_upload_routes};

/// Mount every `/api/v1` route.
/// Note: the `.pdf` routes under `/reports` are registered with the PDF group.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_health_routes)
        .configure(configure_advisor_routes)
        .configure(configure_report_routes)
        .configure(configure_upload_routes)
        .configure(configure_pdf_routes);
}

/// JSON body errors answer with the same `{ error, message }` body as
/// every other failure.
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}

/// Query string errors, same treatment as [`json_config`].
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::InvalidInput(err.to_string()).into())
}
