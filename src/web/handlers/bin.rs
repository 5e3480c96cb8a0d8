//! Bin handlers for the web API.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::bins::{BinId, UploadFile};
use crate::web::dto::{
    AddFilesResponse, BinInfoResponse, CreateBinResponse, DeleteBinResponse, DeleteFileResponse,
    ServiceInfoResponse,
};
use crate::web::error::{ApiError, ErrorBody};
use crate::web::handlers::AppState;

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Control characters are removed, and quotes or backslashes fall back to
/// the RFC 5987 `filename*` form.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && !filename.chars().any(|c| c.is_control() || c == '"' || c == '\\') {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::info!("Rejected oversized upload: {}", e);
        ApiError::payload_too_large("Request body is too large")
    } else {
        tracing::error!("Failed to read multipart field: {}", e);
        ApiError::bad_request("Invalid multipart data")
    }
}

/// Collect every `file` part that carries a filename.
async fn read_upload_files(multipart: &mut Multipart) -> Result<Vec<UploadFile>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        // Browsers send an empty part when nothing was selected
        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let content = field.bytes().await.map_err(multipart_error)?;
        files.push(UploadFile::new(filename, content.to_vec()));
    }

    Ok(files)
}

/// GET / - Service information.
///
/// Runs the expiry sweep first when enabled.
#[utoipa::path(
    get,
    path = "/",
    tag = "service",
    responses(
        (status = 200, description = "Service information", body = ServiceInfoResponse)
    )
)]
pub async fn landing(State(state): State<Arc<AppState>>) -> Json<ServiceInfoResponse> {
    let mut purged = 0;
    if state.sweep_on_landing {
        match state.bin_service().sweep_expired(Utc::now()).await {
            Ok(count) => purged = count,
            Err(e) => tracing::warn!(error = %e, "Expiry sweep on landing failed"),
        }
    }

    Json(ServiceInfoResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        max_bin_size: state.settings.max_bin_size,
        retention_days: state.settings.retention.num_days(),
        purged,
    })
}

/// POST /api/v1/bins - Create a bin.
///
/// Request body: multipart/form-data with zero or more "file" parts.
#[utoipa::path(
    post,
    path = "/api/v1/bins",
    tag = "bins",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Zero or more `file` parts"),
    responses(
        (status = 200, description = "Bin created", body = CreateBinResponse),
        (status = 400, description = "Quota exceeded or invalid filename", body = ErrorBody),
        (status = 413, description = "Request body too large", body = ErrorBody)
    )
)]
pub async fn create_bin(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<CreateBinResponse>, ApiError> {
    let files = read_upload_files(&mut multipart).await?;
    let bin = state.bin_service().create_bin(files).await?;

    Ok(Json(CreateBinResponse {
        success: true,
        file_id: bin.id.to_string(),
        message: "Bin created successfully".to_string(),
    }))
}

/// GET /api/v1/bins/:id - Get bin information.
#[utoipa::path(
    get,
    path = "/api/v1/bins/{id}",
    tag = "bins",
    params(
        ("id" = String, Path, description = "Bin ID")
    ),
    responses(
        (status = 200, description = "Bin information", body = BinInfoResponse),
        (status = 404, description = "Bin not found", body = ErrorBody)
    )
)]
pub async fn get_bin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BinInfoResponse>, ApiError> {
    let bin_id = BinId::parse(&id)?;
    let summary = state.bin_service().get_bin(&bin_id).await?;

    Ok(Json(BinInfoResponse::from(&summary)))
}

/// POST /api/v1/bins/:id - Add files to a bin.
///
/// Request body: multipart/form-data with one or more "file" parts.
#[utoipa::path(
    post,
    path = "/api/v1/bins/{id}",
    tag = "bins",
    params(
        ("id" = String, Path, description = "Bin ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "One or more `file` parts"),
    responses(
        (status = 200, description = "Files added", body = AddFilesResponse),
        (status = 400, description = "No file, invalid filename or quota exceeded", body = ErrorBody),
        (status = 404, description = "Bin not found", body = ErrorBody),
        (status = 413, description = "Request body too large", body = ErrorBody)
    )
)]
pub async fn add_files(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<AddFilesResponse>, ApiError> {
    let bin_id = BinId::parse(&id)?;
    let files = read_upload_files(&mut multipart).await?;

    let added = state.bin_service().add_files(&bin_id, files).await?;

    Ok(Json(AddFilesResponse {
        success: true,
        file_id: bin_id.to_string(),
        filenames: added.filenames,
        message: "Files added successfully".to_string(),
    }))
}

/// GET /api/v1/bins/:id/files/:filename - Download a file.
#[utoipa::path(
    get,
    path = "/api/v1/bins/{id}/files/{filename}",
    tag = "bins",
    params(
        ("id" = String, Path, description = "Bin ID"),
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "File content", content_type = "application/octet-stream"),
        (status = 404, description = "Bin or file not found", body = ErrorBody)
    )
)]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path((id, filename)): Path<(String, String)>,
) -> Result<Response<Body>, ApiError> {
    let bin_id = BinId::parse(&id)?;
    let result = state.bin_service().download(&bin_id, &filename).await?;

    let content_type = mime_guess::from_path(&result.file.filename)
        .first_or_octet_stream()
        .to_string();

    let response = Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&result.file.filename),
        )
        .header(header::CONTENT_LENGTH, result.content.len())
        .body(Body::from(result.content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

/// DELETE /api/v1/bins/:id/files/:filename - Delete one file.
#[utoipa::path(
    delete,
    path = "/api/v1/bins/{id}/files/{filename}",
    tag = "bins",
    params(
        ("id" = String, Path, description = "Bin ID"),
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "File deleted", body = DeleteFileResponse),
        (status = 404, description = "Bin or file not found", body = ErrorBody)
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path((id, filename)): Path<(String, String)>,
) -> Result<Json<DeleteFileResponse>, ApiError> {
    let bin_id = BinId::parse(&id)?;
    let removed = state.bin_service().remove_file(&bin_id, &filename).await?;

    Ok(Json(DeleteFileResponse {
        success: true,
        message: "File deleted successfully".to_string(),
        is_empty: removed.bin_empty,
    }))
}

/// DELETE /api/v1/bins/:id - Delete a bin.
#[utoipa::path(
    delete,
    path = "/api/v1/bins/{id}",
    tag = "bins",
    params(
        ("id" = String, Path, description = "Bin ID")
    ),
    responses(
        (status = 200, description = "Bin deleted", body = DeleteBinResponse),
        (status = 404, description = "Bin not found", body = ErrorBody)
    )
)]
pub async fn delete_bin(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteBinResponse>, ApiError> {
    let bin_id = BinId::parse(&id)?;
    state.bin_service().delete_bin(&bin_id).await?;

    Ok(Json(DeleteBinResponse {
        success: true,
        message: "Bin deleted successfully".to_string(),
    }))
}

/// Body limit for upload routes: the quota plus room for multipart framing.
pub fn upload_body_limit(max_bin_size: u64) -> usize {
    const MULTIPART_OVERHEAD: u64 = 64 * 1024;
    usize::try_from(max_bin_size.saturating_add(MULTIPART_OVERHEAD)).unwrap_or(usize::MAX)
}
