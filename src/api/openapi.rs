//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models, store};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Homeroom Report Server",
        version = "0.1.0",
        description = "Records weekly homeroom sessions per advisor and prints them as A4 PDF reports"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Advisor endpoints
        api::advisors::list_advisors,
        api::advisors::create_advisor,
        api::advisors::update_advisor,
        api::advisors::delete_advisor,
        // Report endpoints
        api::reports::list_reports,
        api::reports::list_report_photos,
        api::reports::create_report,
        // Upload endpoints
        api::uploads::upload_photos,
        // PDF endpoints
        api::pdf::generate_pdf,
        api::pdf::advisor_report_pdf,
        api::pdf::summary_pdf,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            store::StoreMode,
            // Advisors
            models::Advisor,
            models::AdvisorInput,
            // Reports
            models::HomeroomReport,
            models::NewHomeroomReport,
            models::SavedReportResponse,
            api::reports::PhotoListResponse,
            // Uploads
            api::uploads::UploadResponse,
            // PDF
            models::PdfMode,
            models::PhotoLayout,
            models::AdvisorInfo,
            models::PdfData,
            models::PdfRequest,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Advisors", description = "Homeroom advisor management"),
        (name = "Reports", description = "Weekly homeroom session reports"),
        (name = "Uploads", description = "Activity photo uploads"),
        (name = "PDF", description = "Printable report generation")
    )
)]
pub struct ApiDoc;
