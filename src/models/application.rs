// src/models/application.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Application {
    pub id: String,
    pub job_id: String,
    pub user_id: String,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(job_id: String, user_id: String, cover_letter: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            job_id,
            user_id,
            cover_letter,
            status: ApplicationStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateApplicationRequest {
    pub job_id: String,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateApplicationStatusRequest {
    pub status: ApplicationStatus,
}
