// src/web/handlers/admin_handlers.rs
use askama::Template;
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::State;

use crate::auth::AdminUser;
use crate::database::{ActivityLogRepository, Database, DatabaseStats};
use crate::error::AppResult;
use crate::fake_job::FakeJobService;
use crate::models::{ActivityLog, AnalysisStatistics, LogFilter, Page, Pagination};
use crate::utils::truncate_chars;
use crate::web::types::{DataResponse, LogQuery, PageQuery};

const DASHBOARD_RECENT_LOGS: u32 = 20;

pub async fn list_logs_handler(
    _admin: AdminUser,
    query: LogQuery,
    page: PageQuery,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Page<ActivityLog>>>> {
    let filter = LogFilter {
        user_id: query.user_id,
        path_prefix: query.path_prefix,
    };
    let logs = ActivityLogRepository::new(database.pool())
        .list(&filter, page.pagination())
        .await?;

    Ok(Json(DataResponse::success(
        format!("{} activity log entries", logs.total),
        logs,
    )))
}

pub async fn stats_handler(
    _admin: AdminUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<DatabaseStats>>> {
    let stats = database.stats().await?;
    Ok(Json(DataResponse::success("Database statistics", stats)))
}

#[derive(Template)]
#[template(path = "admin_dashboard.html")]
pub struct DashboardTemplate {
    pub stats: DatabaseStats,
    pub analyses: AnalysisStatistics,
    pub recent: Vec<DashboardLogRow>,
}

pub struct DashboardLogRow {
    pub time: String,
    pub method: String,
    pub path: String,
    pub status_code: i64,
    pub duration_ms: i64,
    pub user: String,
}

impl From<&ActivityLog> for DashboardLogRow {
    fn from(log: &ActivityLog) -> Self {
        Self {
            time: log.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            method: log.method.clone(),
            path: truncate_chars(&log.path, 80),
            status_code: log.status_code,
            duration_ms: log.duration_ms,
            user: log.user_id.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

pub async fn dashboard_handler(
    _admin: AdminUser,
    database: &State<Database>,
    fake_jobs: &State<FakeJobService>,
) -> AppResult<RawHtml<String>> {
    let stats = database.stats().await?;
    let analyses = fake_jobs.statistics().await?;
    let recent = ActivityLogRepository::new(database.pool())
        .list(
            &LogFilter::default(),
            Pagination::new(Some(1), Some(DASHBOARD_RECENT_LOGS)),
        )
        .await?;

    let template = DashboardTemplate {
        stats,
        analyses,
        recent: recent.items.iter().map(DashboardLogRow::from).collect(),
    };
    let html = template
        .render()
        .map_err(|e| anyhow::anyhow!("Failed to render admin dashboard: {}", e))?;

    Ok(RawHtml(html))
}
