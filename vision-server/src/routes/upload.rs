//! File and folder upload endpoints.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use vision_ai_common::{FolderUploadReply, UploadReply};

use super::rejection_error;
use crate::error::{Error, Result};
use crate::AppState;

/// Build the upload router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/upload-file", post(upload_file))
        .route("/upload-folder", post(upload_folder))
}

fn multipart_error(e: MultipartError) -> Error {
    rejection_error(e.status(), Error::BadRequest(e.body_text()))
}

fn open_multipart(
    payload: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Multipart> {
    payload.map_err(|rejection| {
        tracing::warn!("Rejected upload: {}", rejection.body_text());
        rejection_error(rejection.status(), Error::BadRequest("No file part".to_string()))
    })
}

/// POST /upload-file - store the first file part named `file`.
async fn upload_file(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadReply>> {
    let mut multipart = open_multipart(payload)?;
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if upload.is_some() || field.name() != Some("file") {
            continue;
        }
        // Parts without a filename are plain form values, not files.
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let data = field.bytes().await.map_err(multipart_error)?;
        upload = Some((file_name, data));
    }

    let (file_name, data) =
        upload.ok_or_else(|| Error::BadRequest("No file part".to_string()))?;
    if file_name.is_empty() {
        return Err(Error::BadRequest("No selected file".to_string()));
    }

    state.uploads.save(&file_name, &data).await?;

    Ok(Json(UploadReply {
        message: format!("File {} uploaded successfully", file_name),
    }))
}

/// POST /upload-folder - store every file part named `files`, or `files[]`
/// when there are none.
async fn upload_folder(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<FolderUploadReply>> {
    let mut multipart = open_multipart(payload)?;
    let mut files: Vec<(String, Bytes)> = Vec::new();
    let mut bracketed: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let target = match field.name() {
            Some("files") => &mut files,
            Some("files[]") => &mut bracketed,
            _ => continue,
        };
        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => continue,
        };
        let data = field.bytes().await.map_err(multipart_error)?;
        target.push((file_name, data));
    }

    let selected = if files.is_empty() { bracketed } else { files };
    if selected.is_empty() {
        return Err(Error::BadRequest("No files provided".to_string()));
    }

    let mut saved = Vec::with_capacity(selected.len());
    for (file_name, data) in selected {
        state.uploads.save(&file_name, &data).await?;
        saved.push(file_name);
    }

    tracing::info!("Folder upload stored {} files", saved.len());
    Ok(Json(FolderUploadReply::new(saved)))
}
