//! PDF endpoints.
//!
//! `POST /pdf` prints caller-supplied data. The two `GET` variants gather
//! the data server-side from the record store first.

use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};
use crate::models::{AdvisorInfo, PdfData, PdfMode, PdfRequest, PhotoLayout};
use crate::services::aggregation::photos_of;
use crate::services::{GeneratedPdf, PdfService, ReportFilter, ReportService};

/// Query for an advisor's printable report.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AdvisorPdfQuery {
    pub advisor_id: String,
    pub term: String,
    pub academic_year: String,
    /// cover, table, photos or all (default)
    pub mode: Option<String>,
    /// four (default) or six
    pub photo_layout: Option<String>,
}

/// Query for the cross-advisor summary.
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPdfQuery {
    pub term: String,
    pub academic_year: String,
}

/// Configure PDF routes.
pub fn configure_pdf_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(generate_pdf)
        .service(advisor_report_pdf)
        .service(summary_pdf);
}

fn pdf_response(pdf: GeneratedPdf) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", pdf.file_name),
        ))
        .body(pdf.bytes)
}

/// Print a document from supplied data.
#[utoipa::path(
    post,
    path = "/api/v1/pdf",
    tag = "PDF",
    request_body = PdfRequest,
    responses(
        (status = 200, description = "PDF attachment", content_type = "application/pdf"),
        (status = 400, description = "Invalid mode or missing advisor", body = crate::error::ErrorResponse),
        (status = 500, description = "Rendering failed", body = crate::error::ErrorResponse)
    )
)]
#[post("/pdf")]
pub async fn generate_pdf(
    pdf: web::Data<PdfService>,
    body: web::Json<PdfRequest>,
) -> AppResult<HttpResponse> {
    let PdfRequest { mode, data } = body.into_inner();
    let generated = pdf.generate(mode, &data).await?;
    Ok(pdf_response(generated))
}

/// Print one advisor's report for a term.
#[utoipa::path(
    get,
    path = "/api/v1/reports/advisor.pdf",
    tag = "PDF",
    params(AdvisorPdfQuery),
    responses(
        (status = 200, description = "PDF attachment", content_type = "application/pdf"),
        (status = 400, description = "Invalid query", body = crate::error::ErrorResponse),
        (status = 404, description = "Advisor not found", body = crate::error::ErrorResponse)
    )
)]
#[get("/reports/advisor.pdf")]
pub async fn advisor_report_pdf(
    reports: web::Data<ReportService>,
    pdf: web::Data<PdfService>,
    query: web::Query<AdvisorPdfQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let mode = match query.mode.as_deref() {
        None | Some("") => PdfMode::All,
        Some(raw) => PdfMode::parse(raw)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown mode '{}'", raw)))?,
    };
    let photo_layout = match query.photo_layout.as_deref() {
        None | Some("") => PhotoLayout::default(),
        Some(raw) => PhotoLayout::parse(raw)
            .ok_or_else(|| AppError::InvalidInput(format!("unknown photo layout '{}'", raw)))?,
    };

    let advisor = reports.advisor(&query.advisor_id).await?;
    let filter = ReportFilter::new(&query.term, &query.academic_year).with_advisor(&advisor.name);
    let history = reports.history(&filter).await?;

    let data = PdfData {
        term: filter.term.clone(),
        academic_year: filter.academic_year.clone(),
        advisor: Some(AdvisorInfo::from(&advisor)),
        photos: photos_of(&history),
        reports: history,
        photo_layout,
    };

    let generated = pdf.generate(mode, &data).await?;
    Ok(pdf_response(generated))
}

/// Print the cross-advisor summary for a term.
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary.pdf",
    tag = "PDF",
    params(SummaryPdfQuery),
    responses(
        (status = 200, description = "PDF attachment", content_type = "application/pdf"),
        (status = 400, description = "Missing term or year", body = crate::error::ErrorResponse)
    )
)]
#[get("/reports/summary.pdf")]
pub async fn summary_pdf(
    reports: web::Data<ReportService>,
    pdf: web::Data<PdfService>,
    query: web::Query<SummaryPdfQuery>,
) -> AppResult<HttpResponse> {
    let summary = reports.summary(&query.term, &query.academic_year).await?;
    let data = PdfData {
        term: query.term.trim().to_string(),
        academic_year: query.academic_year.trim().to_string(),
        reports: summary,
        ..Default::default()
    };

    let generated = pdf.generate(PdfMode::Summary, &data).await?;
    Ok(pdf_response(generated))
}
