use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::models::cv::{CvRecord, NewCvRecord};
use crate::models::job::{Job, NewJob};
use crate::store::{CvStore, JobStore, StoreError};

pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn list_recent(&self, limit: i64) -> Result<Vec<Job>, StoreError> {
        Ok(sqlx::query_as::<_, Job>(
            r#"
            SELECT id, title, company, location, description, url, created_at
            FROM jobs
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn insert(&self, job: &NewJob) -> Result<Job, StoreError> {
        let row = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (title, company, location, description, url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, company, location, description, url, created_at
            "#,
        )
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(&job.description)
        .bind(&job.url)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted job {} ({})", row.id, row.title);
        Ok(row)
    }
}

pub struct PgCvStore {
    pool: PgPool,
}

impl PgCvStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CvStore for PgCvStore {
    async fn insert(&self, record: &NewCvRecord) -> Result<CvRecord, StoreError> {
        let row = sqlx::query_as::<_, CvRecord>(
            r#"
            INSERT INTO cvs
                (user_id, original_file_url, parsed_skills, parsed_roles,
                 parsed_location, experience_years)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, original_file_url, parsed_skills, parsed_roles,
                      parsed_location, experience_years, created_at
            "#,
        )
        .bind(&record.user_id)
        .bind(&record.original_file_url)
        .bind(&record.parsed_skills)
        .bind(&record.parsed_roles)
        .bind(&record.parsed_location)
        .bind(record.experience_years)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted CV record {}", row.id);
        Ok(row)
    }
}
