// src/database/mod.rs
//! Connection management, schema, and one repository per collection

pub mod activity_logs;
pub mod analyses;
pub mod applications;
pub mod companies;
pub mod jobs;
pub mod users;

pub use activity_logs::ActivityLogRepository;
pub use analyses::AnalysisRepository;
pub use applications::ApplicationRepository;
pub use companies::CompanyRepository;
pub use jobs::JobRepository;
pub use users::UserRepository;

use anyhow::{Context, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::path::Path;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        email TEXT NOT NULL UNIQUE,
        full_name TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        skills TEXT NOT NULL DEFAULT '[]',
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT,
        website TEXT,
        industry TEXT,
        location TEXT,
        created_by TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        company_id TEXT,
        company_name TEXT,
        description TEXT NOT NULL,
        requirements TEXT NOT NULL DEFAULT '[]',
        location TEXT,
        job_type TEXT NOT NULL,
        salary_min REAL,
        salary_max REAL,
        salary_currency TEXT,
        contact_email TEXT,
        source TEXT NOT NULL,
        source_url TEXT UNIQUE,
        posted_by TEXT,
        is_active BOOLEAN NOT NULL DEFAULT TRUE,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS applications (
        id TEXT PRIMARY KEY,
        job_id TEXT NOT NULL,
        user_id TEXT NOT NULL,
        cover_letter TEXT,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (job_id, user_id)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS activity_logs (
        id TEXT PRIMARY KEY,
        user_id TEXT,
        method TEXT NOT NULL,
        path TEXT NOT NULL,
        status_code INTEGER NOT NULL,
        duration_ms INTEGER NOT NULL,
        ip TEXT,
        user_agent TEXT,
        action TEXT,
        created_at TEXT NOT NULL
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS fake_job_analyses (
        id TEXT PRIMARY KEY,
        job_id TEXT,
        rule_score REAL NOT NULL,
        ai_score REAL,
        final_score REAL NOT NULL,
        risk_level TEXT NOT NULL,
        is_suspicious BOOLEAN NOT NULL,
        red_flags TEXT NOT NULL DEFAULT '[]',
        ai_reasoning TEXT,
        ai_model TEXT,
        ai_error TEXT,
        analyzed_at TEXT NOT NULL
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_jobs_created_at ON jobs(created_at);",
    "CREATE INDEX IF NOT EXISTS idx_jobs_company_id ON jobs(company_id);",
    "CREATE INDEX IF NOT EXISTS idx_applications_user_id ON applications(user_id);",
    "CREATE INDEX IF NOT EXISTS idx_activity_logs_created_at ON activity_logs(created_at);",
    "CREATE INDEX IF NOT EXISTS idx_analyses_job_id ON fake_job_analyses(job_id, analyzed_at);",
];

#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the SQLite file and run migrations
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!(
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .context("Failed to apply database schema")?;
        }

        info!("Database migrations completed");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }

    /// Document counts shown on the admin dashboard
    pub async fn stats(&self) -> Result<DatabaseStats> {
        Ok(DatabaseStats {
            jobs: count(&self.pool, "SELECT COUNT(*) FROM jobs").await?,
            active_jobs: count(&self.pool, "SELECT COUNT(*) FROM jobs WHERE is_active = TRUE")
                .await?,
            users: count(&self.pool, "SELECT COUNT(*) FROM users").await?,
            companies: count(&self.pool, "SELECT COUNT(*) FROM companies").await?,
            applications: count(&self.pool, "SELECT COUNT(*) FROM applications").await?,
            analyses: count(&self.pool, "SELECT COUNT(*) FROM fake_job_analyses").await?,
            suspicious_analyses: count(
                &self.pool,
                "SELECT COUNT(*) FROM fake_job_analyses WHERE is_suspicious = TRUE",
            )
            .await?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseStats {
    pub jobs: i64,
    pub active_jobs: i64,
    pub users: i64,
    pub companies: i64,
    pub applications: i64,
    pub analyses: i64,
    pub suspicious_analyses: i64,
}

async fn count(pool: &SqlitePool, sql: &str) -> Result<i64> {
    let total: i64 = sqlx::query_scalar(sql)
        .fetch_one(pool)
        .await
        .with_context(|| format!("Failed to run count query: {}", sql))?;
    Ok(total)
}
