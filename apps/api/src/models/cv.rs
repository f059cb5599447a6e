use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Summary of one CV upload. Written once, never updated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvRecord {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub original_file_url: Option<String>,
    pub parsed_skills: Vec<String>,
    pub parsed_roles: Vec<String>,
    pub parsed_location: Vec<String>,
    pub experience_years: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a CV record. Role, location and experience are
/// placeholders that start out empty.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewCvRecord {
    pub user_id: Option<String>,
    pub original_file_url: Option<String>,
    pub parsed_skills: Vec<String>,
    pub parsed_roles: Vec<String>,
    pub parsed_location: Vec<String>,
    pub experience_years: Option<i32>,
}

impl NewCvRecord {
    pub fn new(
        user_id: Option<String>,
        original_file_url: Option<String>,
        parsed_skills: Vec<String>,
    ) -> Self {
        NewCvRecord {
            user_id,
            original_file_url,
            parsed_skills,
            parsed_roles: Vec::new(),
            parsed_location: Vec::new(),
            experience_years: None,
        }
    }
}
