//! Supabase client: PostgREST tables for job/CV rows and Storage for CV files.
//!
//! Speaks the plain REST surface with the service key in both the `apikey`
//! and `Authorization` headers. No retries: a failed call fails the request.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::config::SupabaseConfig;
use crate::models::cv::{CvRecord, NewCvRecord};
use crate::models::job::{Job, NewJob};
use crate::store::{BucketError, CvStore, FileBucket, JobStore, StoreError, StoredObject};

const JOBS_TABLE: &str = "jobs";
const CVS_TABLE: &str = "cvs";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Field names a signing response may carry the URL under, in lookup order.
/// Older Storage releases answer `signedURL`, newer ones `signedUrl`.
const URL_FIELDS: [&str; 2] = ["signedURL", "signedUrl"];

#[derive(Debug, Deserialize)]
struct SupabaseErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    key: String,
    bucket: String,
    signed_url_ttl_secs: Option<u64>,
}

impl SupabaseClient {
    pub fn new(config: &SupabaseConfig, bucket: &str) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: config.url.trim_end_matches('/').to_string(),
            key: config.key.clone(),
            bucket: bucket.to_string(),
            signed_url_ttl_secs: config.signed_url_ttl_secs,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn object_url(&self, kind: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}{}/{}",
            self.base_url,
            kind,
            self.bucket,
            key
        )
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    /// Inserts one row and returns it as stored (`Prefer: return=representation`).
    async fn insert_row<B, T>(&self, table: &'static str, body: &B) -> Result<T, StoreError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let mut rows: Vec<T> = read_json(response).await.map_err(StoreError::from)?;
        if rows.is_empty() {
            return Err(StoreError::EmptyResponse(table));
        }
        Ok(rows.swap_remove(0))
    }

    /// Asks Storage for a signed URL. Any failure leaves the URL unset.
    async fn sign(&self, key: &str, ttl_secs: u64) -> Option<String> {
        let response = self
            .authed(self.client.post(self.object_url("sign/", key)))
            .json(&json!({ "expiresIn": ttl_secs }))
            .send()
            .await;

        let body: Value = match response {
            Ok(r) => match read_json(r).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Signing {key} failed: {e}");
                    return None;
                }
            },
            Err(e) => {
                warn!("Signing {key} failed: {e}");
                return None;
            }
        };

        let resolved = resolve_url_field(&body).map(|u| self.absolute_storage_url(&u));
        if resolved.is_none() {
            warn!("Signing response for {key} carried no URL: {body}");
        }
        resolved
    }

    /// Signed URLs come back relative to `/storage/v1`.
    fn absolute_storage_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!(
                "{}/storage/v1/{}",
                self.base_url,
                url.trim_start_matches('/')
            )
        }
    }
}

#[async_trait]
impl JobStore for SupabaseClient {
    async fn list_recent(&self, limit: i64) -> Result<Vec<Job>, StoreError> {
        let response = self
            .authed(self.client.get(self.table_url(JOBS_TABLE)))
            .query(&[
                ("select", "*".to_string()),
                ("order", "created_at.desc,id.desc".to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let jobs: Vec<Job> = read_json(response).await?;
        debug!("Fetched {} jobs from Supabase", jobs.len());
        Ok(jobs)
    }

    async fn insert(&self, job: &NewJob) -> Result<Job, StoreError> {
        let row: Job = self.insert_row(JOBS_TABLE, job).await?;
        info!("Inserted job {} ({}) via Supabase", row.id, row.title);
        Ok(row)
    }
}

#[async_trait]
impl CvStore for SupabaseClient {
    async fn insert(&self, record: &NewCvRecord) -> Result<CvRecord, StoreError> {
        let row: CvRecord = self.insert_row(CVS_TABLE, record).await?;
        info!("Inserted CV record {} via Supabase", row.id);
        Ok(row)
    }
}

#[async_trait]
impl FileBucket for SupabaseClient {
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, BucketError> {
        let response = self
            .authed(self.client.post(self.object_url("", key)))
            .header("content-type", content_type)
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BucketError::Api {
                status: status.as_u16(),
                message: error_message(body),
            });
        }

        info!("Uploaded CV to Supabase bucket {}/{}", self.bucket, key);

        let public_url = match self.signed_url_ttl_secs {
            Some(ttl) => self.sign(key, ttl).await,
            None => Some(self.object_url("public/", key)),
        };

        Ok(StoredObject {
            key: key.to_string(),
            public_url,
        })
    }
}

/// Errors shared by the table and storage endpoints before they are mapped
/// to the caller's error type.
#[derive(Debug, thiserror::Error)]
enum ReadError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("status {status}: {message}")]
    Api { status: u16, message: String },
}

impl From<ReadError> for StoreError {
    fn from(e: ReadError) -> Self {
        match e {
            ReadError::Http(e) => StoreError::Http(e),
            ReadError::Api { status, message } => StoreError::Api { status, message },
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ReadError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ReadError::Api {
            status: status.as_u16(),
            message: error_message(body),
        });
    }
    Ok(response.json().await?)
}

/// Pulls `message` out of a Supabase error body, falling back to the raw body.
fn error_message(body: String) -> String {
    serde_json::from_str::<SupabaseErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body)
}

/// Looks the URL up under each conventional field name in turn.
fn resolve_url_field(body: &Value) -> Option<String> {
    URL_FIELDS
        .iter()
        .find_map(|field| {
            body.get(field)
                .and_then(|v| v.as_str())
                .filter(|url| !url.is_empty())
        })
        .map(str::to_string)
}
