// src/fake_job/service.rs
use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use super::detector::{FakeJobDetector, JobText};
use crate::database::{AnalysisRepository, Database, JobRepository};
use crate::models::{AnalysisStatistics, FakeJobAnalysis};

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub analyzed: usize,
    pub suspicious: usize,
    pub failed: usize,
}

/// Runs the detector and persists its reports
pub struct FakeJobService {
    detector: FakeJobDetector,
    database: Database,
}

impl FakeJobService {
    pub fn new(detector: FakeJobDetector, database: Database) -> Self {
        Self { detector, database }
    }

    pub fn detector(&self) -> &FakeJobDetector {
        &self.detector
    }

    /// Returns `None` when the job does not exist
    pub async fn analyze_job(&self, job_id: &str, use_ai: bool) -> Result<Option<FakeJobAnalysis>> {
        let jobs = JobRepository::new(self.database.pool());
        let Some(job) = jobs.find_by_id(job_id).await? else {
            return Ok(None);
        };

        let report = self.detector.analyze(&JobText::from(&job), use_ai).await;
        let analysis = FakeJobAnalysis::from_report(Some(job.id), report);
        AnalysisRepository::new(self.database.pool())
            .insert(&analysis)
            .await?;

        Ok(Some(analysis))
    }

    pub async fn analyze_text(&self, job: &JobText, use_ai: bool) -> Result<FakeJobAnalysis> {
        let report = self.detector.analyze(job, use_ai).await;
        let analysis = FakeJobAnalysis::from_report(None, report);
        AnalysisRepository::new(self.database.pool())
            .insert(&analysis)
            .await?;
        Ok(analysis)
    }

    pub async fn latest_analysis(&self, job_id: &str) -> Result<Option<FakeJobAnalysis>> {
        AnalysisRepository::new(self.database.pool())
            .latest_for_job(job_id)
            .await
    }

    /// Analyzes active jobs that have never been analyzed, newest first
    pub async fn batch_analyze(&self, limit: u32, use_ai: bool) -> Result<BatchSummary> {
        let jobs = JobRepository::new(self.database.pool())
            .list_unanalyzed(i64::from(limit))
            .await?;
        let analyses = AnalysisRepository::new(self.database.pool());

        let mut summary = BatchSummary::default();
        for job in jobs {
            let report = self.detector.analyze(&JobText::from(&job), use_ai).await;
            let analysis = FakeJobAnalysis::from_report(Some(job.id.clone()), report);

            match analyses.insert(&analysis).await {
                Ok(()) => {
                    summary.analyzed += 1;
                    if analysis.is_suspicious {
                        summary.suspicious += 1;
                    }
                }
                Err(e) => {
                    warn!("Failed to store analysis for job {}: {:#}", job.id, e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Batch analysis finished: {} analyzed, {} suspicious, {} failed",
            summary.analyzed, summary.suspicious, summary.failed
        );
        Ok(summary)
    }

    pub async fn statistics(&self) -> Result<AnalysisStatistics> {
        AnalysisRepository::new(self.database.pool())
            .statistics()
            .await
    }
}
