// src/database/analyses.rs
use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::models::{AnalysisStatistics, FakeJobAnalysis, RiskLevelCount};

const ANALYSIS_COLUMNS: &str = "id, job_id, rule_score, ai_score, final_score, risk_level, \
    is_suspicious, red_flags, ai_reasoning, ai_model, ai_error, analyzed_at";

pub struct AnalysisRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnalysisRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, analysis: &FakeJobAnalysis) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO fake_job_analyses (id, job_id, rule_score, ai_score, final_score,
                risk_level, is_suspicious, red_flags, ai_reasoning, ai_model, ai_error, analyzed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&analysis.id)
        .bind(&analysis.job_id)
        .bind(analysis.rule_score)
        .bind(analysis.ai_score)
        .bind(analysis.final_score)
        .bind(analysis.risk_level)
        .bind(analysis.is_suspicious)
        .bind(&analysis.red_flags)
        .bind(&analysis.ai_reasoning)
        .bind(&analysis.ai_model)
        .bind(&analysis.ai_error)
        .bind(analysis.analyzed_at)
        .execute(self.pool)
        .await
        .context("Failed to insert fake job analysis")?;

        Ok(())
    }

    pub async fn latest_for_job(&self, job_id: &str) -> Result<Option<FakeJobAnalysis>> {
        let analysis = sqlx::query_as::<_, FakeJobAnalysis>(&format!(
            "SELECT {} FROM fake_job_analyses WHERE job_id = ? ORDER BY analyzed_at DESC LIMIT 1",
            ANALYSIS_COLUMNS
        ))
        .bind(job_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(analysis)
    }

    pub async fn statistics(&self) -> Result<AnalysisStatistics> {
        let total_analyses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM fake_job_analyses")
            .fetch_one(self.pool)
            .await?;

        let suspicious_analyses: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM fake_job_analyses WHERE is_suspicious = TRUE",
        )
        .fetch_one(self.pool)
        .await?;

        let average_score: Option<f64> =
            sqlx::query_scalar("SELECT AVG(final_score) FROM fake_job_analyses")
                .fetch_one(self.pool)
                .await
                .context("Failed to compute average score")?;

        let by_risk_level = sqlx::query_as::<_, RiskLevelCount>(
            r#"
            SELECT risk_level, COUNT(*) AS count
            FROM fake_job_analyses
            GROUP BY risk_level
            ORDER BY risk_level ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(AnalysisStatistics {
            total_analyses,
            suspicious_analyses,
            average_score: average_score
                .map(|score| (score * 100.0).round() / 100.0)
                .unwrap_or(0.0),
            by_risk_level,
        })
    }
}
