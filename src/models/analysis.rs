// src/models/analysis.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::fake_job::{DetectionReport, RedFlag, RiskLevel};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FakeJobAnalysis {
    pub id: String,
    /// Absent for ad-hoc text analysis
    pub job_id: Option<String>,
    pub rule_score: f64,
    pub ai_score: Option<f64>,
    pub final_score: f64,
    pub risk_level: RiskLevel,
    pub is_suspicious: bool,
    pub red_flags: Json<Vec<RedFlag>>,
    pub ai_reasoning: Option<String>,
    pub ai_model: Option<String>,
    pub ai_error: Option<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl FakeJobAnalysis {
    pub fn from_report(job_id: Option<String>, report: DetectionReport) -> Self {
        Self {
            id: super::new_id(),
            job_id,
            rule_score: report.rule_score,
            ai_score: report.ai_score,
            final_score: report.final_score,
            risk_level: report.risk_level,
            is_suspicious: report.is_suspicious,
            red_flags: Json(report.red_flags),
            ai_reasoning: report.ai_reasoning,
            ai_model: report.ai_model,
            ai_error: report.ai_error,
            analyzed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct RiskLevelCount {
    pub risk_level: RiskLevel,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisStatistics {
    pub total_analyses: i64,
    pub suspicious_analyses: i64,
    pub average_score: f64,
    pub by_risk_level: Vec<RiskLevelCount>,
}
