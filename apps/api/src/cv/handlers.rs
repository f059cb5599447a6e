use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;

use crate::cv::ingest::{ingest_cv, CvUpload, CvUploadResponse};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /cv/upload
///
/// Multipart form: required `file`, optional `user_id`.
pub async fn handle_cv_upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CvUploadResponse>, AppError> {
    let upload = read_upload_form(multipart?).await?;
    let response = ingest_cv(state.cvs.as_ref(), state.bucket.as_ref(), upload).await?;
    Ok(Json(response))
}

async fn read_upload_form(mut multipart: Multipart) -> Result<CvUpload, AppError> {
    let mut user_id: Option<String> = None;
    let mut file: Option<(String, bytes::Bytes)> = None;

    // Read errors keep their status; an over-limit body surfaces as 413.
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field.bytes().await?;
                file = Some((filename, data));
            }
            Some("user_id") => {
                user_id = Some(field.text().await?);
            }
            _ => {}
        }
    }

    let (filename, data) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;

    tracing::debug!(filename = %filename, bytes = data.len(), "CV upload received");

    Ok(CvUpload {
        filename,
        data,
        user_id,
    })
}
