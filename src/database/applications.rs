// src/database/applications.rs
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

use crate::models::{Application, ApplicationStatus};

const APPLICATION_COLUMNS: &str =
    "id, job_id, user_id, cover_letter, status, created_at, updated_at";

pub struct ApplicationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ApplicationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, application: &Application) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO applications (id, job_id, user_id, cover_letter, status, created_at,
                updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&application.id)
        .bind(&application.job_id)
        .bind(&application.user_id)
        .bind(&application.cover_letter)
        .bind(application.status)
        .bind(application.created_at)
        .bind(application.updated_at)
        .execute(self.pool)
        .await
        .context("Failed to insert application")?;

        info!(
            "User {} applied to job {}",
            application.user_id, application.job_id
        );
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Application>> {
        let application = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE id = ?",
            APPLICATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(application)
    }

    pub async fn exists(&self, job_id: &str, user_id: &str) -> Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE job_id = ? AND user_id = ?")
                .bind(job_id)
                .bind(user_id)
                .fetch_one(self.pool)
                .await?;

        Ok(count > 0)
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE user_id = ? ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(applications)
    }

    pub async fn list_for_job(&self, job_id: &str) -> Result<Vec<Application>> {
        let applications = sqlx::query_as::<_, Application>(&format!(
            "SELECT {} FROM applications WHERE job_id = ? ORDER BY created_at ASC",
            APPLICATION_COLUMNS
        ))
        .bind(job_id)
        .fetch_all(self.pool)
        .await?;

        Ok(applications)
    }

    pub async fn update_status(&self, id: &str, status: ApplicationStatus) -> Result<bool> {
        let result = sqlx::query("UPDATE applications SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(self.pool)
            .await
            .context("Failed to update application status")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;

    #[tokio::test]
    async fn test_one_application_per_user_and_job() {
        let (db, _dir) = temp_database().await;
        let repo = ApplicationRepository::new(db.pool());

        let first = Application::new("job-1".to_string(), "user-1".to_string(), None);
        repo.insert(&first).await.unwrap();
        assert!(repo.exists("job-1", "user-1").await.unwrap());
        assert!(!repo.exists("job-1", "user-2").await.unwrap());

        let duplicate = Application::new("job-1".to_string(), "user-1".to_string(), None);
        assert!(repo.insert(&duplicate).await.is_err());
    }

    #[tokio::test]
    async fn test_update_status() {
        let (db, _dir) = temp_database().await;
        let repo = ApplicationRepository::new(db.pool());

        let application = Application::new("job-1".to_string(), "user-1".to_string(), None);
        repo.insert(&application).await.unwrap();
        assert!(repo
            .update_status(&application.id, ApplicationStatus::Accepted)
            .await
            .unwrap());

        let found = repo.find_by_id(&application.id).await.unwrap().unwrap();
        assert_eq!(found.status, ApplicationStatus::Accepted);
        assert_eq!(repo.list_for_job("job-1").await.unwrap().len(), 1);
        assert_eq!(repo.list_for_user("user-1").await.unwrap().len(), 1);
    }
}
