// src/web/routes.rs
use rocket::form::Form;
use rocket::http::Status;
use rocket::response::content::RawHtml;
use rocket::serde::json::Json;
use rocket::{delete, get, options, post, put, State};

use super::handlers;
use super::types::*;
use crate::auth::{AdminUser, AuthConfig, AuthenticatedUser, OptionalAuth};
use crate::crawler::{CrawlRequest, ImportSummary, LinkedInCrawler};
use crate::cv::{CvServices, ParsedCv};
use crate::database::{Database, DatabaseStats};
use crate::error::AppResult;
use crate::fake_job::{BatchSummary, FakeJobService};
use crate::models::{
    ActivityLog, AnalysisStatistics, Application, Company, CreateApplicationRequest,
    CreateCompanyRequest, CreateJobRequest, FakeJobAnalysis, Job, Page, PublicUser,
    RegisterRequest, UpdateApplicationStatusRequest, UpdateCompanyRequest, UpdateJobRequest,
    UpdateUserRequest,
};
use crate::translation::{LanguageDetection, TranslatedJob, Translation, TranslationClient};

// System

#[get("/health")]
pub async fn health(
    database: &State<Database>,
    fake_jobs: &State<FakeJobService>,
    translation: &State<TranslationClient>,
) -> (Status, Json<DataResponse<HealthData>>) {
    handlers::health_handler(database, fake_jobs, translation).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Auth

#[post("/auth/register", data = "<request>")]
pub async fn register(
    request: Json<RegisterRequest>,
    database: &State<Database>,
    auth_config: &State<AuthConfig>,
) -> AppResult<(Status, Json<DataResponse<AuthTokenData>>)> {
    handlers::register_handler(request, database, auth_config).await
}

#[post("/auth/login", data = "<request>")]
pub async fn login(
    request: Json<LoginRequest>,
    database: &State<Database>,
    auth_config: &State<AuthConfig>,
) -> AppResult<Json<DataResponse<AuthTokenData>>> {
    handlers::login_handler(request, database, auth_config).await
}

#[get("/auth/me")]
pub async fn me(auth: AuthenticatedUser) -> Json<DataResponse<PublicUser>> {
    handlers::me_handler(auth).await
}

// Jobs

#[get("/jobs?<q>&<location>&<job_type>&<company_id>&<active_only>&<page>&<limit>")]
#[allow(clippy::too_many_arguments)]
pub async fn list_jobs(
    q: Option<String>,
    location: Option<String>,
    job_type: Option<String>,
    company_id: Option<String>,
    active_only: Option<bool>,
    page: Option<u32>,
    limit: Option<u32>,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Page<Job>>>> {
    let query = JobQuery {
        q,
        location,
        job_type,
        company_id,
        active_only,
    };
    handlers::list_jobs_handler(query, PageQuery { page, limit }, database).await
}

#[post("/jobs", data = "<request>")]
pub async fn create_job(
    request: Json<CreateJobRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<(Status, Json<DataResponse<Job>>)> {
    handlers::create_job_handler(request, auth, database).await
}

#[get("/jobs/<id>")]
pub async fn get_job(
    id: &str,
    viewer: OptionalAuth,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Job>>> {
    handlers::get_job_handler(id, viewer, database).await
}

#[put("/jobs/<id>", data = "<request>")]
pub async fn update_job(
    id: &str,
    request: Json<UpdateJobRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Job>>> {
    handlers::update_job_handler(id, request, auth, database).await
}

#[delete("/jobs/<id>")]
pub async fn delete_job(
    id: &str,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<ActionResponse>> {
    handlers::delete_job_handler(id, auth, database).await
}

#[get("/jobs/<id>/applications")]
pub async fn job_applications(
    id: &str,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Vec<Application>>>> {
    handlers::job_applications_handler(id, auth, database).await
}

// Companies

#[get("/companies?<page>&<limit>")]
pub async fn list_companies(
    page: Option<u32>,
    limit: Option<u32>,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Page<Company>>>> {
    handlers::list_companies_handler(PageQuery { page, limit }, database).await
}

#[post("/companies", data = "<request>")]
pub async fn create_company(
    request: Json<CreateCompanyRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<(Status, Json<DataResponse<Company>>)> {
    handlers::create_company_handler(request, auth, database).await
}

#[get("/companies/<id>")]
pub async fn get_company(
    id: &str,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Company>>> {
    handlers::get_company_handler(id, database).await
}

#[put("/companies/<id>", data = "<request>")]
pub async fn update_company(
    id: &str,
    request: Json<UpdateCompanyRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Company>>> {
    handlers::update_company_handler(id, request, auth, database).await
}

#[delete("/companies/<id>")]
pub async fn delete_company(
    id: &str,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<ActionResponse>> {
    handlers::delete_company_handler(id, auth, database).await
}

// Users

#[get("/users?<page>&<limit>")]
pub async fn list_users(
    admin: AdminUser,
    page: Option<u32>,
    limit: Option<u32>,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Page<PublicUser>>>> {
    handlers::list_users_handler(admin, PageQuery { page, limit }, database).await
}

#[get("/users/<id>")]
pub async fn get_user(
    id: &str,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<PublicUser>>> {
    handlers::get_user_handler(id, auth, database).await
}

#[put("/users/<id>", data = "<request>")]
pub async fn update_user(
    id: &str,
    request: Json<UpdateUserRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<PublicUser>>> {
    handlers::update_user_handler(id, request, auth, database).await
}

#[delete("/users/<id>")]
pub async fn delete_user(
    id: &str,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<ActionResponse>> {
    handlers::delete_user_handler(id, auth, database).await
}

// Applications

#[post("/applications", data = "<request>")]
pub async fn apply(
    request: Json<CreateApplicationRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<(Status, Json<DataResponse<Application>>)> {
    handlers::apply_handler(request, auth, database).await
}

#[get("/applications/me")]
pub async fn my_applications(
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Vec<Application>>>> {
    handlers::my_applications_handler(auth, database).await
}

#[put("/applications/<id>/status", data = "<request>")]
pub async fn update_application_status(
    id: &str,
    request: Json<UpdateApplicationStatusRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Application>>> {
    handlers::update_application_status_handler(id, request, auth, database).await
}

// Fake job detection

#[post("/fake-job-detection/analyze-job", data = "<request>")]
pub async fn analyze_job_text(
    request: Json<AnalyzeJobTextRequest>,
    service: &State<FakeJobService>,
) -> AppResult<Json<DataResponse<FakeJobAnalysis>>> {
    handlers::analyze_text_handler(request, service).await
}

#[post("/fake-job-detection/analyze-job/<job_id>", data = "<options>")]
pub async fn analyze_stored_job(
    job_id: &str,
    options: Option<Json<AnalyzeOptions>>,
    service: &State<FakeJobService>,
) -> AppResult<Json<DataResponse<FakeJobAnalysis>>> {
    handlers::analyze_stored_job_handler(job_id, options, service).await
}

#[get("/fake-job-detection/analysis/<job_id>")]
pub async fn latest_analysis(
    job_id: &str,
    service: &State<FakeJobService>,
) -> AppResult<Json<DataResponse<FakeJobAnalysis>>> {
    handlers::latest_analysis_handler(job_id, service).await
}

#[get("/fake-job-detection/statistics")]
pub async fn analysis_statistics(
    service: &State<FakeJobService>,
) -> AppResult<Json<DataResponse<AnalysisStatistics>>> {
    handlers::statistics_handler(service).await
}

#[post("/fake-job-detection/batch-analyze", data = "<request>")]
pub async fn batch_analyze(
    admin: AdminUser,
    request: Option<Json<BatchAnalyzeRequest>>,
    service: &State<FakeJobService>,
) -> AppResult<Json<DataResponse<BatchSummary>>> {
    handlers::batch_analyze_handler(admin, request, service).await
}

// Translation

#[post("/translation/translate-text", data = "<request>")]
pub async fn translate_text(
    request: Json<TranslateTextRequest>,
    client: &State<TranslationClient>,
) -> AppResult<Json<DataResponse<Translation>>> {
    handlers::translate_text_handler(request, client).await
}

#[post("/translation/detect-language", data = "<request>")]
pub async fn detect_language(
    request: Json<DetectLanguageRequest>,
    client: &State<TranslationClient>,
) -> AppResult<Json<DataResponse<LanguageDetection>>> {
    handlers::detect_language_handler(request, client).await
}

#[post("/translation/translate-job/<job_id>", data = "<request>")]
pub async fn translate_job(
    job_id: &str,
    request: Json<TranslateJobRequest>,
    client: &State<TranslationClient>,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<TranslatedJob>>> {
    handlers::translate_job_handler(job_id, request, client, database).await
}

// CV

#[post("/cv/parse", data = "<request>")]
pub async fn parse_cv(
    request: Json<ParseCvRequest>,
    auth: AuthenticatedUser,
    services: &State<CvServices>,
) -> AppResult<Json<DataResponse<ParsedCv>>> {
    handlers::parse_cv_handler(request, auth, services).await
}

#[post("/cv/upload", data = "<upload>")]
pub async fn upload_cv(
    upload: Form<CvUploadForm<'_>>,
    auth: AuthenticatedUser,
    services: &State<CvServices>,
) -> AppResult<Json<DataResponse<ParsedCv>>> {
    handlers::upload_cv_handler(upload, auth, services).await
}

// Crawler

#[post("/crawler/linkedin", data = "<request>")]
pub async fn crawl_linkedin(
    request: Json<CrawlRequest>,
    admin: AdminUser,
    crawler: &State<LinkedInCrawler>,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    handlers::crawl_linkedin_handler(request, admin, crawler, database).await
}

// Admin

#[get("/admin/logs?<user_id>&<path_prefix>&<page>&<limit>")]
pub async fn admin_logs(
    admin: AdminUser,
    user_id: Option<String>,
    path_prefix: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Page<ActivityLog>>>> {
    let query = LogQuery {
        user_id,
        path_prefix,
    };
    handlers::list_logs_handler(admin, query, PageQuery { page, limit }, database).await
}

#[get("/admin/stats")]
pub async fn admin_stats(
    admin: AdminUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<DatabaseStats>>> {
    handlers::stats_handler(admin, database).await
}

#[get("/admin/dashboard")]
pub async fn admin_dashboard(
    admin: AdminUser,
    database: &State<Database>,
    fake_jobs: &State<FakeJobService>,
) -> AppResult<RawHtml<String>> {
    handlers::dashboard_handler(admin, database, fake_jobs).await
}
