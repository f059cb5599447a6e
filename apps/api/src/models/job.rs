use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: i64,
    pub title: String,
    pub company: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a job. Only `title` is required.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl NewJob {
    /// The fixed listing inserted by `POST /jobs/insert-dummy`.
    pub fn sample() -> Self {
        NewJob {
            title: "Junior Python Developer".to_string(),
            company: Some("Acme Analytics".to_string()),
            location: Some("Remote".to_string()),
            description: Some(
                "Build data pipelines with Python, SQL and Docker. Postgres experience a plus."
                    .to_string(),
            ),
            url: Some("https://example.com/jobs/junior-python-developer".to_string()),
        }
    }
}
