//! Advisor API endpoints.
//!
//! Advisor ids are derived from name, class level and room, so they may
//! contain `/` (rooms such as `1/1`). Item routes therefore match the rest
//! of the path as the id.

use actix_web::{HttpResponse, delete, get, post, put, web};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{Advisor, AdvisorInput, AdvisorQuery, current_buddhist_year};
use crate::store::RecordStore;

/// Configure advisor routes.
pub fn configure_advisor_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_advisors)
        .service(create_advisor)
        .service(update_advisor)
        .service(delete_advisor);
}

fn validated(input: AdvisorInput) -> AppResult<Advisor> {
    input.validate().map_err(AppError::InvalidInput)?;
    Ok(input.into_advisor(current_buddhist_year()))
}

/// List advisors.
///
/// GET /advisors?year=2568
#[utoipa::path(
    get,
    path = "/api/v1/advisors",
    tag = "Advisors",
    params(
        ("year" = Option<i32>, Query, description = "Academic year (Buddhist era)")
    ),
    responses(
        (status = 200, description = "Advisors in sheet order", body = Vec<Advisor>)
    )
)]
#[get("/advisors")]
pub async fn list_advisors(
    store: web::Data<RecordStore>,
    query: web::Query<AdvisorQuery>,
) -> AppResult<HttpResponse> {
    let advisors = store.get_advisors(query.year).await;
    Ok(HttpResponse::Ok().json(advisors))
}

/// Add an advisor.
#[utoipa::path(
    post,
    path = "/api/v1/advisors",
    tag = "Advisors",
    request_body = AdvisorInput,
    responses(
        (status = 201, description = "Advisor added", body = Advisor),
        (status = 400, description = "Missing fields", body = crate::error::ErrorResponse),
        (status = 502, description = "Sheet write failed", body = crate::error::ErrorResponse)
    )
)]
#[post("/advisors")]
pub async fn create_advisor(
    store: web::Data<RecordStore>,
    body: web::Json<AdvisorInput>,
) -> AppResult<HttpResponse> {
    let advisor = validated(body.into_inner())?;
    store.add_advisor(advisor.clone()).await?;
    info!(advisor_id = %advisor.id, "Advisor added");
    Ok(HttpResponse::Created().json(advisor))
}

/// Replace an advisor.
#[utoipa::path(
    put,
    path = "/api/v1/advisors/{id}",
    tag = "Advisors",
    params(
        ("id" = String, Path, description = "Current advisor id")
    ),
    request_body = AdvisorInput,
    responses(
        (status = 200, description = "Advisor updated", body = Advisor),
        (status = 400, description = "Missing fields", body = crate::error::ErrorResponse),
        (status = 404, description = "Advisor not found", body = crate::error::ErrorResponse)
    )
)]
#[put("/advisors/{id:.*}")]
pub async fn update_advisor(
    store: web::Data<RecordStore>,
    path: web::Path<String>,
    body: web::Json<AdvisorInput>,
) -> AppResult<HttpResponse> {
    let old_id = path.into_inner();
    let advisor = validated(body.into_inner())?;
    store.update_advisor(&old_id, advisor.clone()).await?;
    info!(old_id = %old_id, advisor_id = %advisor.id, "Advisor updated");
    Ok(HttpResponse::Ok().json(advisor))
}

/// Remove an advisor.
#[utoipa::path(
    delete,
    path = "/api/v1/advisors/{id}",
    tag = "Advisors",
    params(
        ("id" = String, Path, description = "Advisor id")
    ),
    responses(
        (status = 204, description = "Advisor removed"),
        (status = 404, description = "Advisor not found", body = crate::error::ErrorResponse)
    )
)]
#[delete("/advisors/{id:.*}")]
pub async fn delete_advisor(
    store: web::Data<RecordStore>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    store.delete_advisor(&id).await?;
    info!(advisor_id = %id, "Advisor removed");
    Ok(HttpResponse::NoContent().finish())
}
