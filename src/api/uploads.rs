//! Photo upload endpoint.
//!
//! Accepts multipart form data with one or more `files` parts and an
//! optional `namePrefix` text part, forwards each image to the upload
//! endpoint and returns the URLs that came back.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, post, web};
use futures_util::StreamExt;
use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::services::UploadClient;
use crate::services::upload::{UploadFile, prefixed_file_name};

const FILES_FIELD: &str = "files";
const NAME_PREFIX_FIELD: &str = "namePrefix";

/// Upper bound for the `namePrefix` text part.
const MAX_PREFIX_LEN: usize = 256;

/// Upload result.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Hosted URLs of the files that uploaded, in submission order
    pub urls: Vec<String>,
    pub uploaded: usize,
    pub failed: usize,
}

/// Maximum accepted payload, shared from configuration.
#[derive(Debug, Clone, Copy)]
pub struct MaxUploadSize(pub usize);

/// Configure upload routes.
pub fn configure_upload_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(upload_photos);
}

/// Upload photos.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    tag = "Uploads",
    request_body(content_type = "multipart/form-data", description = "`files` parts plus optional `namePrefix`"),
    responses(
        (status = 200, description = "Upload finished (possibly partially)", body = UploadResponse),
        (status = 400, description = "No files or payload too large", body = crate::error::ErrorResponse),
        (status = 502, description = "Every file failed to upload", body = crate::error::ErrorResponse)
    )
)]
#[post("/uploads")]
pub async fn upload_photos(
    client: web::Data<UploadClient>,
    max_size: web::Data<MaxUploadSize>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    let (files, prefix) = read_multipart(&mut payload, max_size.0).await?;
    if files.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "No '{}' parts in upload",
            FILES_FIELD
        )));
    }

    let files: Vec<UploadFile> = files
        .into_iter()
        .enumerate()
        .map(|(index, mut file)| {
            file.file_name = prefixed_file_name(prefix.as_deref(), index, &file.file_name);
            file
        })
        .collect();

    let urls = client.upload_batch(&files).await;
    let failed = files.len() - urls.len();

    if urls.is_empty() {
        return Err(AppError::Upload(format!(
            "all {} file(s) failed to upload",
            files.len()
        )));
    }
    if failed > 0 {
        warn!("{} of {} photo(s) failed to upload", failed, files.len());
    }
    info!("Uploaded {} photo(s)", urls.len());

    Ok(HttpResponse::Ok().json(UploadResponse {
        uploaded: urls.len(),
        failed,
        urls,
    }))
}

/// Buffer the `files` parts and read `namePrefix`. Other parts are drained.
async fn read_multipart(
    payload: &mut Multipart,
    max_size: usize,
) -> AppResult<(Vec<UploadFile>, Option<String>)> {
    let mut files = Vec::new();
    let mut prefix = None;
    let mut total: usize = 0;

    while let Some(item) = payload.next().await {
        let mut field =
            item.map_err(|e| AppError::InvalidInput(format!("Multipart error: {}", e)))?;

        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(|f| f.replace('\\', "/").rsplit('/').next().unwrap_or("").to_string());
        let mime_type = field
            .content_type()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::InvalidInput(format!("Read error: {}", e)))?;
            total += chunk.len();
            if total > max_size {
                return Err(AppError::InvalidInput(format!(
                    "Upload exceeds {}MB",
                    max_size / 1024 / 1024
                )));
            }
            if name == FILES_FIELD || name == NAME_PREFIX_FIELD {
                data.extend_from_slice(&chunk);
            }
        }

        match (name.as_str(), file_name) {
            (FILES_FIELD, Some(file_name)) if !data.is_empty() => {
                files.push(UploadFile {
                    file_name: if file_name.is_empty() {
                        format!("photo_{}", files.len() + 1)
                    } else {
                        file_name
                    },
                    mime_type,
                    data,
                });
            }
            (NAME_PREFIX_FIELD, _) if data.len() <= MAX_PREFIX_LEN => {
                prefix = Some(String::from_utf8_lossy(&data).trim().to_string());
            }
            _ => {}
        }
    }

    Ok((files, prefix))
}
