// src/database/activity_logs.rs
use anyhow::{Context, Result};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::models::{ActivityLog, LogFilter, NewActivityLog, Page, Pagination};

const LOG_COLUMNS: &str =
    "id, user_id, method, path, status_code, duration_ms, ip, user_agent, action, created_at";

pub struct ActivityLogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ActivityLogRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: NewActivityLog) -> Result<ActivityLog> {
        let log = ActivityLog::from(entry);

        sqlx::query(
            r#"
            INSERT INTO activity_logs (id, user_id, method, path, status_code, duration_ms, ip,
                user_agent, action, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&log.id)
        .bind(&log.user_id)
        .bind(&log.method)
        .bind(&log.path)
        .bind(log.status_code)
        .bind(log.duration_ms)
        .bind(&log.ip)
        .bind(&log.user_agent)
        .bind(&log.action)
        .bind(log.created_at)
        .execute(self.pool)
        .await
        .context("Failed to insert activity log")?;

        Ok(log)
    }

    /// Newest first
    pub async fn list(&self, filter: &LogFilter, pagination: Pagination) -> Result<Page<ActivityLog>> {
        let mut count_query =
            QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM activity_logs WHERE 1 = 1");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.pool)
            .await
            .context("Failed to count activity logs")?;

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM activity_logs WHERE 1 = 1",
            LOG_COLUMNS
        ));
        push_filters(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let logs = query
            .build_query_as::<ActivityLog>()
            .fetch_all(self.pool)
            .await
            .context("Failed to list activity logs")?;

        Ok(Page::new(logs, total, pagination))
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &LogFilter) {
    if let Some(user_id) = &filter.user_id {
        query.push(" AND user_id = ").push_bind(user_id.clone());
    }
    // Literal, case-sensitive prefix match
    if let Some(prefix) = &filter.path_prefix {
        query
            .push(" AND substr(path, 1, length(")
            .push_bind(prefix.clone())
            .push(")) = ")
            .push_bind(prefix.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;

    fn entry(path: &str, user_id: Option<&str>) -> NewActivityLog {
        NewActivityLog {
            user_id: user_id.map(str::to_string),
            method: "GET".to_string(),
            path: path.to_string(),
            status_code: 200,
            duration_ms: 3,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_list_filters_by_user_and_prefix() {
        let (db, _dir) = temp_database().await;
        let repo = ActivityLogRepository::new(db.pool());

        repo.insert(entry("/jobs", Some("user-1"))).await.unwrap();
        repo.insert(entry("/jobs/abc", Some("user-2"))).await.unwrap();
        repo.insert(entry("/companies", None)).await.unwrap();

        let all = repo.list(&LogFilter::default(), Pagination::default()).await.unwrap();
        assert_eq!(all.total, 3);

        let jobs_only = LogFilter {
            path_prefix: Some("/jobs".to_string()),
            ..Default::default()
        };
        assert_eq!(repo.list(&jobs_only, Pagination::default()).await.unwrap().total, 2);

        let user_only = LogFilter {
            user_id: Some("user-2".to_string()),
            ..Default::default()
        };
        let page = repo.list(&user_only, Pagination::default()).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].path, "/jobs/abc");
    }

    #[tokio::test]
    async fn test_path_prefix_is_literal() {
        let (db, _dir) = temp_database().await;
        let repo = ActivityLogRepository::new(db.pool());
        repo.insert(entry("/jobs", None)).await.unwrap();
        repo.insert(entry("/cv/upload_100%", None)).await.unwrap();

        for (prefix, expected) in [("/j_bs", 0), ("/%", 0), ("/JOBS", 0), ("/cv/upload_100%", 1)] {
            let filter = LogFilter {
                path_prefix: Some(prefix.to_string()),
                ..Default::default()
            };
            let total = repo.list(&filter, Pagination::default()).await.unwrap().total;
            assert_eq!(total, expected, "prefix {}", prefix);
        }
    }
}
