//! File version handlers.

use axum::Json;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use filevault_core::error::AppError;
use filevault_core::result::AppResult;
use filevault_core::types::LogicalId;
use filevault_entity::file::{FileCandidate, FileVersion};

use crate::dto::response::{FileVersionResponse, MessageResponse};
use crate::error::ApiError;
use crate::extractors::RequestCancellation;
use crate::extractors::path::{parse_logical_id, parse_row_id, parse_version};
use crate::state::AppState;

const OCTET_STREAM: &str = "application/octet-stream";

/// Query string for `GET /api/files`.
#[derive(Debug, Default, Deserialize)]
pub struct ListFilesQuery {
    /// Restrict the listing to one logical file.
    pub file_id: Option<Uuid>,
}

/// GET /api/files?file_id=...
pub async fn list_files(
    State(state): State<AppState>,
    cancel: RequestCancellation,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<Vec<FileVersionResponse>>, ApiError> {
    let rows = state
        .version_service
        .get_all(query.file_id.map(LogicalId::from_uuid), cancel.token())
        .await?;

    Ok(Json(rows.iter().map(FileVersionResponse::from).collect()))
}

/// GET /api/files/{id}
pub async fn download_by_row_id(
    State(state): State<AppState>,
    cancel: RequestCancellation,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_row_id(&id)?;
    let row = state
        .version_service
        .get_by_row_id(id, cancel.token())
        .await?
        .ok_or_else(|| AppError::not_found(format!("File row {id} not found")))?;

    Ok(content_response(row))
}

/// GET /api/files/{file_id}/latest
pub async fn download_latest(
    State(state): State<AppState>,
    cancel: RequestCancellation,
    Path(file_id): Path<String>,
) -> Result<Response, ApiError> {
    let file_id = parse_logical_id(&file_id)?;
    let row = state
        .version_service
        .get_latest(file_id, cancel.token())
        .await?
        .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

    Ok(content_response(row))
}

/// GET /api/files/{file_id}/{version}
pub async fn download_version(
    State(state): State<AppState>,
    cancel: RequestCancellation,
    Path((file_id, version)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let file_id = parse_logical_id(&file_id)?;
    let version = parse_version(&version)?;
    let row = state
        .version_service
        .get_by_logical_and_version(file_id, version, cancel.token())
        .await?
        .ok_or_else(|| {
            AppError::not_found(format!("Version {version} of file {file_id} not found"))
        })?;

    Ok(content_response(row))
}

/// POST /api/files: multipart upload of a new logical file
pub async fn create_file(
    State(state): State<AppState>,
    cancel: RequestCancellation,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let candidate = read_single_file(multipart).await?;
    let row = state
        .version_service
        .create(candidate, cancel.token())
        .await?;

    tracing::info!(
        id = row.id,
        file_id = %row.logical_id,
        size_bytes = row.size_bytes(),
        "File created"
    );
    Ok(created_response(&row))
}

/// PUT /api/files/{file_id}: multipart upload of the next version
pub async fn update_file(
    State(state): State<AppState>,
    cancel: RequestCancellation,
    Path(file_id): Path<String>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let file_id = parse_logical_id(&file_id)?;
    let candidate = read_single_file(multipart).await?;

    let row = match state
        .version_service
        .update(file_id, candidate, cancel.token())
        .await
    {
        Ok(Some(row)) => row,
        Ok(None) => return Err(AppError::not_found(format!("File {file_id} not found")).into()),
        Err(e) if e.is_conflict() => {
            tracing::warn!(file_id = %file_id, error = %e, "Concurrent update lost the race");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        id = row.id,
        file_id = %row.logical_id,
        version = row.version,
        "File version added"
    );
    Ok(created_response(&row))
}

/// DELETE /api/files/{id}
pub async fn delete_by_row_id(
    State(state): State<AppState>,
    cancel: RequestCancellation,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_row_id(&id)?;
    if !state
        .version_service
        .delete_by_row_id(id, cancel.token())
        .await?
    {
        return Err(AppError::not_found(format!("File row {id} not found")).into());
    }

    tracing::info!(id, "File row deleted");
    Ok(Json(MessageResponse::new(format!("File row {id} deleted"))))
}

/// DELETE /api/files/{file_id}/{version}
pub async fn delete_version(
    State(state): State<AppState>,
    cancel: RequestCancellation,
    Path((file_id, version)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    let file_id = parse_logical_id(&file_id)?;
    let version = parse_version(&version)?;
    if !state
        .version_service
        .delete_by_logical_and_version(file_id, version, cancel.token())
        .await?
    {
        return Err(AppError::not_found(format!(
            "Version {version} of file {file_id} not found"
        ))
        .into());
    }

    tracing::info!(file_id = %file_id, version, "File version deleted");
    Ok(Json(MessageResponse::new(format!(
        "Version {version} of file {file_id} deleted"
    ))))
}

/// Collects the single file part of a multipart body.
///
/// Non-file fields are ignored. Zero or several file parts is a
/// validation error.
async fn read_single_file(mut multipart: Multipart) -> AppResult<FileCandidate> {
    let mut candidate: Option<FileCandidate> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {}", e.body_text())))?
    {
        let Some(file_name) = field.file_name().map(String::from) else {
            continue;
        };
        if candidate.is_some() {
            return Err(AppError::validation("Exactly one file part is required"));
        }

        let content_type = field.content_type().map(String::from);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("Read error: {}", e.body_text())))?;

        let mut next = FileCandidate::new(data.to_vec());
        if !file_name.is_empty() {
            next = next.with_file_name(file_name);
        }
        if let Some(content_type) = content_type {
            next = next.with_content_type(content_type);
        }
        candidate = Some(next);
    }

    candidate.ok_or_else(|| AppError::validation("Exactly one file part is required"))
}

fn created_response(row: &FileVersion) -> Response {
    let location = format!("/api/files/{}/{}", row.logical_id, row.version);
    let mut response = (StatusCode::CREATED, Json(FileVersionResponse::from(row))).into_response();
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

fn content_response(row: FileVersion) -> Response {
    let content_type = if row.content_type.is_empty() {
        HeaderValue::from_static(OCTET_STREAM)
    } else {
        HeaderValue::from_str(&row.content_type)
            .unwrap_or_else(|_| HeaderValue::from_static(OCTET_STREAM))
    };
    let disposition = HeaderValue::from_str(&content_disposition(&row.file_name))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        row.content,
    )
        .into_response()
}

fn content_disposition(file_name: &str) -> String {
    let safe: String = file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    if safe.is_empty() {
        "attachment".to_string()
    } else {
        format!("attachment; filename=\"{safe}\"")
    }
}
