//! In-memory stores for handler and pipeline tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::models::cv::{CvRecord, NewCvRecord};
use crate::models::job::{Job, NewJob};
use crate::store::{BucketError, CvStore, FileBucket, JobStore, StoreError, StoredObject};

#[derive(Default)]
pub struct MemoryJobStore {
    rows: Mutex<Vec<Job>>,
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn list_recent(&self, limit: i64) -> Result<Vec<Job>, StoreError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn insert(&self, job: &NewJob) -> Result<Job, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let row = Job {
            id: rows.len() as i64 + 1,
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            description: job.description.clone(),
            url: job.url.clone(),
            created_at: Utc::now(),
        };
        rows.push(row.clone());
        Ok(row)
    }
}

#[derive(Default)]
pub struct MemoryCvStore {
    pub rows: Mutex<Vec<CvRecord>>,
    fail: AtomicBool,
}

impl MemoryCvStore {
    /// A store whose every insert is rejected.
    pub fn failing() -> Self {
        let store = Self::default();
        store.fail.store(true, Ordering::SeqCst);
        store
    }
}

#[async_trait]
impl CvStore for MemoryCvStore {
    async fn insert(&self, record: &NewCvRecord) -> Result<CvRecord, StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 409,
                message: "duplicate key value violates unique constraint".to_string(),
            });
        }
        let row = CvRecord {
            id: Uuid::new_v4(),
            user_id: record.user_id.clone(),
            original_file_url: record.original_file_url.clone(),
            parsed_skills: record.parsed_skills.clone(),
            parsed_roles: record.parsed_roles.clone(),
            parsed_location: record.parsed_location.clone(),
            experience_years: record.experience_years,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }
}

/// Keeps uploaded objects keyed by name; rejects overwrites.
#[derive(Default)]
pub struct MemoryBucket {
    pub objects: Mutex<Vec<(String, Bytes, String)>>,
}

#[async_trait]
impl FileBucket for MemoryBucket {
    async fn upload(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, BucketError> {
        let mut objects = self.objects.lock().unwrap();
        if objects.iter().any(|(k, _, _)| k == key) {
            return Err(BucketError::Api {
                status: 409,
                message: format!("{key} already exists"),
            });
        }
        objects.push((key.to_string(), data, content_type.to_string()));
        Ok(StoredObject {
            key: key.to_string(),
            public_url: Some(format!("https://bucket.test/cvs/{key}")),
        })
    }
}
