// src/database/companies.rs
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use crate::models::{Company, Page, Pagination};

const COMPANY_COLUMNS: &str =
    "id, name, description, website, industry, location, created_by, created_at, updated_at";

pub struct CompanyRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CompanyRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, company: &Company) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO companies (id, name, description, website, industry, location,
                created_by, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&company.id)
        .bind(&company.name)
        .bind(&company.description)
        .bind(&company.website)
        .bind(&company.industry)
        .bind(&company.location)
        .bind(&company.created_by)
        .bind(company.created_at)
        .bind(company.updated_at)
        .execute(self.pool)
        .await
        .context("Failed to insert company")?;

        info!("Created company {}: {}", company.id, company.name);
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies WHERE id = ?",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(company)
    }

    pub async fn list(&self, pagination: Pagination) -> Result<Page<Company>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM companies")
            .fetch_one(self.pool)
            .await?;

        let companies = sqlx::query_as::<_, Company>(&format!(
            "SELECT {} FROM companies ORDER BY name ASC LIMIT ? OFFSET ?",
            COMPANY_COLUMNS
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(Page::new(companies, total, pagination))
    }

    pub async fn update(&self, company: &Company) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE companies
            SET name = ?, description = ?, website = ?, industry = ?, location = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&company.name)
        .bind(&company.description)
        .bind(&company.website)
        .bind(&company.industry)
        .bind(&company.location)
        .bind(company.updated_at)
        .bind(&company.id)
        .execute(self.pool)
        .await
        .context("Failed to update company")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .context("Failed to delete company")?;

        Ok(result.rows_affected() > 0)
    }
}
