use std::io::Write;

use anyhow::Context;
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cv::extract::{content_type_for, extract_text, Extraction, FileKind};
use crate::cv::skills::match_skills;
use crate::errors::AppError;
use crate::models::cv::NewCvRecord;
use crate::store::{CvStore, FileBucket};

/// One uploaded CV as read from the multipart form.
#[derive(Debug, Clone)]
pub struct CvUpload {
    pub filename: String,
    pub data: Bytes,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    Extracted,
    Failed,
}

/// What happened to the text extraction step, so clients can warn the user
/// when skills were scanned over nothing.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionSummary {
    pub status: ExtractionStatus,
    pub reason: Option<String>,
    pub characters: usize,
}

impl From<&Extraction> for ExtractionSummary {
    fn from(extraction: &Extraction) -> Self {
        match extraction {
            Extraction::Extracted(text) => ExtractionSummary {
                status: ExtractionStatus::Extracted,
                reason: None,
                characters: text.chars().count(),
            },
            Extraction::Failed { reason } => ExtractionSummary {
                status: ExtractionStatus::Failed,
                reason: Some(reason.clone()),
                characters: 0,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CvUploadResponse {
    pub cv_id: Uuid,
    pub user_id: Option<String>,
    pub parsed_skills: Vec<String>,
    pub original_file_url: Option<String>,
    pub extraction: ExtractionSummary,
}

/// Runs the CV pipeline: spool → extract → match skills → store original →
/// persist summary record.
///
/// Only bucket and record-store failures fail the request. A record-store
/// failure leaves the uploaded object in the bucket.
pub async fn ingest_cv(
    records: &dyn CvStore,
    bucket: &dyn FileBucket,
    upload: CvUpload,
) -> Result<CvUploadResponse, AppError> {
    let CvUpload {
        filename,
        data,
        user_id,
    } = upload;
    let kind = FileKind::from_filename(&filename);

    let spooled = spool(&data, &filename)?;
    let extraction = extract_text(spooled.path().to_path_buf(), kind).await;
    drop(spooled);

    let parsed_skills = match_skills(extraction.text());
    info!(
        "Matched {} skills in {filename} ({kind:?})",
        parsed_skills.len()
    );

    let key = storage_key(&filename);
    let stored = bucket
        .upload(&key, data, content_type_for(&filename))
        .await?;
    if stored.public_url.is_none() {
        warn!("No retrieval URL resolved for stored object {}", stored.key);
    }

    let record = NewCvRecord::new(user_id, stored.public_url.clone(), parsed_skills);
    let row = records.insert(&record).await.map_err(|e| {
        // TODO: roll back the bucket object once orphan handling is decided.
        warn!("CV record insert failed, object {} is orphaned", stored.key);
        AppError::Persistence(format!("Failed to save CV record: {e}"))
    })?;

    info!("Stored CV {} as {}", row.id, stored.key);

    Ok(CvUploadResponse {
        cv_id: row.id,
        user_id: row.user_id,
        parsed_skills: row.parsed_skills,
        original_file_url: row.original_file_url,
        extraction: ExtractionSummary::from(&extraction),
    })
}

/// Writes the upload to a transient file that is removed on drop. The
/// extension is kept so extractors see the same name shape.
fn spool(data: &[u8], filename: &str) -> Result<tempfile::NamedTempFile, AppError> {
    let suffix = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let mut file = tempfile::Builder::new()
        .prefix("cv-upload-")
        .suffix(&suffix)
        .tempfile()
        .context("failed to create spool file for CV upload")?;
    file.write_all(data)
        .context("failed to write CV upload to spool file")?;
    file.flush().context("failed to flush CV spool file")?;
    Ok(file)
}

/// `{uuid}_{filename}`: the random prefix keeps identical filenames apart.
fn storage_key(filename: &str) -> String {
    format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename))
}

/// Last path component with anything outside `[A-Za-z0-9._-]` replaced by `_`.
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.is_empty() {
        return "upload".to_string();
    }
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
