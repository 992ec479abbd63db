// src/database/jobs.rs
use anyhow::{Context, Result};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::models::{Job, JobFilter, Page, Pagination};

const JOB_COLUMNS: &str = "id, title, company_id, company_name, description, requirements, \
    location, job_type, salary_min, salary_max, salary_currency, contact_email, source, \
    source_url, posted_by, is_active, created_at, updated_at";

pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, job: &Job) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO jobs (id, title, company_id, company_name, description, requirements,
                location, job_type, salary_min, salary_max, salary_currency, contact_email,
                source, source_url, posted_by, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&job.id)
        .bind(&job.title)
        .bind(&job.company_id)
        .bind(&job.company_name)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.location)
        .bind(job.job_type)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.salary_currency)
        .bind(&job.contact_email)
        .bind(job.source)
        .bind(&job.source_url)
        .bind(&job.posted_by)
        .bind(job.is_active)
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(self.pool)
        .await
        .context("Failed to insert job")?;

        info!("Created job {}: {}", job.id, job.title);
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE id = ?",
            JOB_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(job)
    }

    pub async fn find_by_source_url(&self, source_url: &str) -> Result<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(&format!(
            "SELECT {} FROM jobs WHERE source_url = ?",
            JOB_COLUMNS
        ))
        .bind(source_url)
        .fetch_optional(self.pool)
        .await?;

        Ok(job)
    }

    pub async fn list(&self, filter: &JobFilter, pagination: Pagination) -> Result<Page<Job>> {
        let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM jobs WHERE 1 = 1");
        push_filters(&mut count_query, filter);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(self.pool)
            .await
            .context("Failed to count jobs")?;

        let mut query =
            QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM jobs WHERE 1 = 1", JOB_COLUMNS));
        push_filters(&mut query, filter);
        query
            .push(" ORDER BY created_at DESC LIMIT ")
            .push_bind(pagination.limit())
            .push(" OFFSET ")
            .push_bind(pagination.offset());

        let jobs = query
            .build_query_as::<Job>()
            .fetch_all(self.pool)
            .await
            .context("Failed to list jobs")?;

        Ok(Page::new(jobs, total, pagination))
    }

    /// Active jobs that have never been analyzed, newest first
    pub async fn list_unanalyzed(&self, limit: i64) -> Result<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {} FROM jobs
            WHERE is_active = TRUE AND id NOT IN (
                SELECT job_id FROM fake_job_analyses WHERE job_id IS NOT NULL
            )
            ORDER BY created_at DESC
            LIMIT ?
            "#,
            JOB_COLUMNS
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(jobs)
    }

    pub async fn update(&self, job: &Job) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET title = ?, company_id = ?, company_name = ?, description = ?, requirements = ?,
                location = ?, job_type = ?, salary_min = ?, salary_max = ?, salary_currency = ?,
                contact_email = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&job.title)
        .bind(&job.company_id)
        .bind(&job.company_name)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.location)
        .bind(job.job_type)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.salary_currency)
        .bind(&job.contact_email)
        .bind(job.is_active)
        .bind(job.updated_at)
        .bind(&job.id)
        .execute(self.pool)
        .await
        .context("Failed to update job")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .context("Failed to delete job")?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted job {}", id);
        }
        Ok(deleted)
    }
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &JobFilter) {
    if filter.active_only {
        query.push(" AND is_active = TRUE");
    }
    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", q);
        query
            .push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" OR description LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(location) = filter.location.as_deref().filter(|l| !l.trim().is_empty()) {
        query
            .push(" AND location LIKE ")
            .push_bind(format!("%{}%", location.trim()));
    }
    if let Some(job_type) = filter.job_type {
        query.push(" AND job_type = ").push_bind(job_type);
    }
    if let Some(company_id) = &filter.company_id {
        query.push(" AND company_id = ").push_bind(company_id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;
    use crate::models::{CreateJobRequest, JobSource, JobType};

    fn job(title: &str, location: &str, job_type: JobType) -> Job {
        Job::new(
            CreateJobRequest {
                title: title.to_string(),
                description: format!("{} role description", title),
                location: Some(location.to_string()),
                job_type,
                ..Default::default()
            },
            JobSource::Manual,
            None,
        )
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let (db, _dir) = temp_database().await;
        let repo = JobRepository::new(db.pool());

        let job = job("Rust Developer", "Berlin", JobType::FullTime);
        repo.insert(&job).await.unwrap();

        let found = repo.find_by_id(&job.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Rust Developer");
        assert_eq!(found.job_type, JobType::FullTime);
        assert!(repo.find_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_applies_filters() {
        let (db, _dir) = temp_database().await;
        let repo = JobRepository::new(db.pool());

        repo.insert(&job("Rust Developer", "Berlin", JobType::FullTime)).await.unwrap();
        repo.insert(&job("Data Analyst", "Paris", JobType::Contract)).await.unwrap();
        let mut inactive = job("Rust Intern", "Berlin", JobType::Internship);
        inactive.is_active = false;
        repo.insert(&inactive).await.unwrap();

        let filter = JobFilter {
            q: Some("rust".to_string()),
            ..Default::default()
        };
        let page = repo.list(&filter, Pagination::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Rust Developer");

        let filter = JobFilter {
            location: Some("berlin".to_string()),
            active_only: false,
            ..Default::default()
        };
        assert_eq!(repo.list(&filter, Pagination::default()).await.unwrap().total, 2);

        let filter = JobFilter {
            job_type: Some(JobType::Contract),
            ..Default::default()
        };
        let page = repo.list(&filter, Pagination::default()).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title, "Data Analyst");
    }

    #[tokio::test]
    async fn test_pagination_limits_items_but_not_total() {
        let (db, _dir) = temp_database().await;
        let repo = JobRepository::new(db.pool());
        for i in 0..5 {
            repo.insert(&job(&format!("Job {}", i), "Remote", JobType::Remote))
                .await
                .unwrap();
        }

        let page = repo
            .list(&JobFilter::default(), Pagination::new(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.page, 2);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (db, _dir) = temp_database().await;
        let repo = JobRepository::new(db.pool());

        let mut job = job("Rust Developer", "Berlin", JobType::FullTime);
        repo.insert(&job).await.unwrap();

        job.title = "Senior Rust Developer".to_string();
        assert!(repo.update(&job).await.unwrap());
        let found = repo.find_by_id(&job.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Senior Rust Developer");

        assert!(repo.delete(&job.id).await.unwrap());
        assert!(!repo.delete(&job.id).await.unwrap());
    }
}
