// src/models/activity_log.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLog {
    pub id: String,
    pub user_id: Option<String>,
    pub method: String,
    pub path: String,
    pub status_code: i64,
    pub duration_ms: i64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub action: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewActivityLog {
    pub user_id: Option<String>,
    pub method: String,
    pub path: String,
    pub status_code: u16,
    pub duration_ms: u64,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub action: Option<String>,
}

impl From<NewActivityLog> for ActivityLog {
    fn from(entry: NewActivityLog) -> Self {
        Self {
            id: super::new_id(),
            user_id: entry.user_id,
            method: entry.method,
            path: entry.path,
            status_code: entry.status_code as i64,
            duration_ms: entry.duration_ms.min(i64::MAX as u64) as i64,
            ip: entry.ip,
            user_agent: entry.user_agent,
            action: entry.action,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub user_id: Option<String>,
    pub path_prefix: Option<String>,
}
