//! Record store and bucket seams.
//!
//! Handlers never talk to Postgres, Supabase or S3 directly. `AppState`
//! carries `Arc<dyn JobStore>`, `Arc<dyn CvStore>` and `Arc<dyn FileBucket>`,
//! chosen at startup from `RECORD_BACKEND` / `STORAGE_BACKEND`.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::models::cv::{CvRecord, NewCvRecord};
use crate::models::job::{Job, NewJob};

#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod s3;
pub mod supabase;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("record store returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("record store returned no row for {0}")]
    EmptyResponse(&'static str),
}

#[derive(Debug, Error)]
pub enum BucketError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("bucket returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("upload failed: {0}")]
    Upload(String),
}

/// A file persisted in the bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredObject {
    pub key: String,
    /// Retrieval URL, or `None` when the backend gave nothing usable.
    pub public_url: Option<String>,
}

#[async_trait]
pub trait JobStore: Send + Sync {
    /// Newest first, at most `limit` rows.
    async fn list_recent(&self, limit: i64) -> Result<Vec<Job>, StoreError>;

    async fn insert(&self, job: &NewJob) -> Result<Job, StoreError>;
}

#[async_trait]
pub trait CvStore: Send + Sync {
    async fn insert(&self, record: &NewCvRecord) -> Result<CvRecord, StoreError>;
}

#[async_trait]
pub trait FileBucket: Send + Sync {
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, BucketError>;
}
