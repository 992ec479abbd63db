// src/web/handlers/fake_job_handlers.rs
use rocket::serde::json::Json;
use rocket::State;

use crate::auth::AdminUser;
use crate::error::{AppError, AppResult};
use crate::fake_job::{BatchSummary, FakeJobService};
use crate::models::{AnalysisStatistics, FakeJobAnalysis};
use crate::web::types::{AnalyzeJobTextRequest, AnalyzeOptions, BatchAnalyzeRequest, DataResponse};

const MAX_BATCH_LIMIT: u32 = 500;

fn analysis_message(analysis: &FakeJobAnalysis) -> String {
    format!(
        "Risk level {} (score {})",
        analysis.risk_level, analysis.final_score
    )
}

pub async fn analyze_text_handler(
    request: Json<AnalyzeJobTextRequest>,
    service: &State<FakeJobService>,
) -> AppResult<Json<DataResponse<FakeJobAnalysis>>> {
    let request = request.into_inner();
    if request.job.title.trim().is_empty() && request.job.description.trim().is_empty() {
        return Err(AppError::Validation(
            "A title or description is required".to_string(),
        ));
    }

    let analysis = service.analyze_text(&request.job, request.use_ai).await?;
    Ok(Json(DataResponse::success(
        analysis_message(&analysis),
        analysis,
    )))
}

pub async fn analyze_stored_job_handler(
    job_id: &str,
    options: Option<Json<AnalyzeOptions>>,
    service: &State<FakeJobService>,
) -> AppResult<Json<DataResponse<FakeJobAnalysis>>> {
    let use_ai = options.map(|o| o.use_ai).unwrap_or(true);
    let analysis = service
        .analyze_job(job_id, use_ai)
        .await?
        .ok_or_else(|| AppError::not_found("Job", job_id))?;

    Ok(Json(DataResponse::success(
        analysis_message(&analysis),
        analysis,
    )))
}

pub async fn latest_analysis_handler(
    job_id: &str,
    service: &State<FakeJobService>,
) -> AppResult<Json<DataResponse<FakeJobAnalysis>>> {
    let analysis = service
        .latest_analysis(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No analysis found for job {}", job_id)))?;

    Ok(Json(DataResponse::success(
        analysis_message(&analysis),
        analysis,
    )))
}

pub async fn statistics_handler(
    service: &State<FakeJobService>,
) -> AppResult<Json<DataResponse<AnalysisStatistics>>> {
    let stats = service.statistics().await?;
    Ok(Json(DataResponse::success(
        format!("{} analyses recorded", stats.total_analyses),
        stats,
    )))
}

pub async fn batch_analyze_handler(
    _admin: AdminUser,
    request: Option<Json<BatchAnalyzeRequest>>,
    service: &State<FakeJobService>,
) -> AppResult<Json<DataResponse<BatchSummary>>> {
    let (limit, use_ai) = request
        .map(|r| (r.limit, r.use_ai))
        .unwrap_or((50, false));
    if limit == 0 || limit > MAX_BATCH_LIMIT {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_BATCH_LIMIT
        )));
    }

    let summary = service.batch_analyze(limit, use_ai).await?;
    Ok(Json(DataResponse::success(
        format!("Analyzed {} jobs", summary.analyzed),
        summary,
    )))
}
