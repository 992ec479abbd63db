// src/web/handlers/crawler_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::auth::AdminUser;
use crate::crawler::{self, CrawlRequest, ImportSummary, LinkedInCrawler};
use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::web::types::DataResponse;

pub async fn crawl_linkedin_handler(
    request: Json<CrawlRequest>,
    admin: AdminUser,
    crawler: &State<LinkedInCrawler>,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    let request = request.into_inner();
    if request.keywords.trim().is_empty() {
        return Err(AppError::Validation("keywords cannot be empty".to_string()));
    }

    info!(
        "Admin {} crawling LinkedIn for '{}' ({} pages)",
        admin.0.email(),
        request.keywords,
        request.pages
    );

    let crawled = crawler
        .crawl(&request)
        .await
        .map_err(AppError::external)?;
    let summary =
        crawler::import_crawled_jobs(database, crawled, Some(admin.0.id().to_string())).await?;

    Ok(Json(DataResponse::success(
        format!(
            "Imported {} of {} crawled jobs",
            summary.imported, summary.fetched
        ),
        summary,
    )))
}
