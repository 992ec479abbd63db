// src/crawler/mod.rs
pub mod linkedin;

pub use linkedin::{CrawlRequest, CrawledJob, LinkedInCrawler};

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::database::{Database, JobRepository};
use crate::models::{CreateJobRequest, Job, JobSource};

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub fetched: usize,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl From<CrawledJob> for CreateJobRequest {
    fn from(crawled: CrawledJob) -> Self {
        let description = crawled
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Imported from LinkedIn: {}", crawled.url));

        CreateJobRequest {
            title: crawled.title,
            company_name: crawled.company,
            description,
            location: crawled.location,
            source_url: Some(crawled.url),
            ..Default::default()
        }
    }
}

/// Stores crawled postings as LinkedIn jobs, skipping any whose URL is already known
pub async fn import_crawled_jobs(
    database: &Database,
    crawled: Vec<CrawledJob>,
    posted_by: Option<String>,
) -> Result<ImportSummary> {
    let repo = JobRepository::new(database.pool());
    let mut summary = ImportSummary {
        fetched: crawled.len(),
        ..Default::default()
    };

    for job in crawled {
        if repo.find_by_source_url(&job.url).await?.is_some() {
            summary.skipped += 1;
            continue;
        }

        let job = Job::new(job.into(), JobSource::Linkedin, posted_by.clone());
        match repo.insert(&job).await {
            Ok(()) => summary.imported += 1,
            Err(e) => {
                warn!("Failed to import {}: {:#}", job.title, e);
                summary.failed += 1;
            }
        }
    }

    info!(
        "LinkedIn import: {} fetched, {} imported, {} skipped, {} failed",
        summary.fetched, summary.imported, summary.skipped, summary.failed
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;

    fn crawled(url: &str) -> CrawledJob {
        CrawledJob {
            title: "Rust Engineer".to_string(),
            company: Some("Acme".to_string()),
            location: Some("Remote".to_string()),
            url: url.to_string(),
            posted_at: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_import_skips_known_urls() {
        let (db, _dir) = temp_database().await;

        let first = import_crawled_jobs(&db, vec![crawled("https://x.test/jobs/1")], None)
            .await
            .unwrap();
        assert_eq!(first.imported, 1);

        let second = import_crawled_jobs(
            &db,
            vec![crawled("https://x.test/jobs/1"), crawled("https://x.test/jobs/2")],
            None,
        )
        .await
        .unwrap();
        assert_eq!(second.fetched, 2);
        assert_eq!(second.imported, 1);
        assert_eq!(second.skipped, 1);

        let stored = JobRepository::new(db.pool())
            .find_by_source_url("https://x.test/jobs/2")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.source, JobSource::Linkedin);
        assert_eq!(stored.description, "Imported from LinkedIn: https://x.test/jobs/2");
    }
}
