use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::job::{Job, NewJob};
use crate::state::AppState;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 500;

#[derive(Debug, Deserialize)]
pub struct ListJobsQuery {
    pub limit: Option<i64>,
}

/// GET /jobs?limit=N
///
/// Newest first, `limit` defaults to 50.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    params: Result<Query<ListJobsQuery>, QueryRejection>,
) -> Result<Json<Vec<Job>>, AppError> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {MAX_LIST_LIMIT}"
        )));
    }

    let jobs = state.jobs.list_recent(limit).await?;
    Ok(Json(jobs))
}

/// POST /jobs/add
pub async fn handle_add_job(
    State(state): State<AppState>,
    job: Result<Json<NewJob>, JsonRejection>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let Json(job) = job?;
    if job.title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let inserted = state.jobs.insert(&job).await?;
    Ok((StatusCode::CREATED, Json(inserted)))
}

/// POST /jobs/insert-dummy
///
/// Demo aid: inserts one fixed sample listing.
pub async fn handle_insert_dummy(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Job>), AppError> {
    let inserted = state.jobs.insert(&NewJob::sample()).await?;
    Ok((StatusCode::CREATED, Json(inserted)))
}
