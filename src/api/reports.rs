//! Homeroom report API endpoints.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::models::{HomeroomReport, NewHomeroomReport, ReportQuery, SavedReportResponse};
use crate::services::{ReportFilter, ReportService};

/// Photo list response.
#[derive(Serialize, ToSchema)]
pub struct PhotoListResponse {
    /// Directly embeddable image URLs, in report order
    pub photos: Vec<String>,
}

/// Configure report routes.
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_reports)
        .service(list_report_photos)
        .service(create_report);
}

/// List reports for one term.
///
/// GET /reports?term=2&academicYear=2568&advisorName=ครูสมชาย
///
/// Sorted by week when an advisor is given, newest first otherwise.
#[utoipa::path(
    get,
    path = "/api/v1/reports",
    tag = "Reports",
    params(
        ("term" = String, Query, description = "Term, e.g. 1 or 2"),
        ("academicYear" = String, Query, description = "Academic year (Buddhist era)"),
        ("advisorName" = Option<String>, Query, description = "Advisor name fragment")
    ),
    responses(
        (status = 200, description = "Matching reports", body = Vec<HomeroomReport>),
        (status = 400, description = "Missing term or year", body = crate::error::ErrorResponse)
    )
)]
#[get("/reports")]
pub async fn list_reports(
    service: web::Data<ReportService>,
    query: web::Query<ReportQuery>,
) -> AppResult<HttpResponse> {
    let filter = ReportFilter::from(query.into_inner());
    let reports = service.history(&filter).await?;
    Ok(HttpResponse::Ok().json(reports))
}

/// Photos attached to the matching reports.
#[utoipa::path(
    get,
    path = "/api/v1/reports/photos",
    tag = "Reports",
    params(
        ("term" = String, Query, description = "Term"),
        ("academicYear" = String, Query, description = "Academic year (Buddhist era)"),
        ("advisorName" = Option<String>, Query, description = "Advisor name fragment")
    ),
    responses(
        (status = 200, description = "Normalized photo URLs", body = PhotoListResponse)
    )
)]
#[get("/reports/photos")]
pub async fn list_report_photos(
    service: web::Data<ReportService>,
    query: web::Query<ReportQuery>,
) -> AppResult<HttpResponse> {
    let filter = ReportFilter::from(query.into_inner());
    let photos = service.photos(&filter).await?;
    Ok(HttpResponse::Ok().json(PhotoListResponse { photos }))
}

/// Save a report.
///
/// Advisors sharing the report's class are merged into one name.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    tag = "Reports",
    request_body = NewHomeroomReport,
    responses(
        (status = 201, description = "Report saved", body = SavedReportResponse),
        (status = 400, description = "Invalid report", body = crate::error::ErrorResponse),
        (status = 502, description = "Sheet write failed", body = crate::error::ErrorResponse)
    )
)]
#[post("/reports")]
pub async fn create_report(
    service: web::Data<ReportService>,
    body: web::Json<NewHomeroomReport>,
) -> AppResult<HttpResponse> {
    let saved = service.save_report(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(saved))
}
