// src/web/handlers/job_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::auth::{AuthenticatedUser, OptionalAuth};
use crate::database::{ApplicationRepository, CompanyRepository, Database, JobRepository};
use crate::error::{AppError, AppResult};
use crate::models::{
    Application, Company, CreateJobRequest, Job, JobFilter, JobSource, JobType, Page,
    UpdateJobRequest,
};
use crate::web::types::{ActionResponse, DataResponse, JobQuery, PageQuery};

async fn load_job(database: &Database, id: &str) -> AppResult<Job> {
    JobRepository::new(database.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Job", id))
}

/// Existing company for a job's `company_id`; unknown ids are a validation error
async fn resolve_company(database: &Database, company_id: &str) -> AppResult<Company> {
    CompanyRepository::new(database.pool())
        .find_by_id(company_id)
        .await?
        .ok_or_else(|| AppError::Validation(format!("Unknown company: {}", company_id)))
}

fn require_owner(auth: &AuthenticatedUser, job: &Job) -> AppResult<()> {
    if auth.can_manage(job.posted_by.as_deref()) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the poster or an admin can manage this job".to_string(),
        ))
    }
}

pub async fn list_jobs_handler(
    query: JobQuery,
    page: PageQuery,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Page<Job>>>> {
    let job_type = query
        .job_type
        .as_deref()
        .map(str::parse::<JobType>)
        .transpose()
        .map_err(AppError::Validation)?;

    let filter = JobFilter {
        q: query.q.filter(|q| !q.trim().is_empty()),
        location: query.location.filter(|l| !l.trim().is_empty()),
        job_type,
        company_id: query.company_id,
        active_only: query.active_only.unwrap_or(true),
    };

    let jobs = JobRepository::new(database.pool())
        .list(&filter, page.pagination())
        .await?;
    Ok(Json(DataResponse::success(
        format!("Found {} jobs", jobs.total),
        jobs,
    )))
}

/// Inactive jobs are only visible to their poster and admins
pub async fn get_job_handler(
    id: &str,
    viewer: OptionalAuth,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Job>>> {
    let job = load_job(database, id).await?;
    let can_see = job.is_active
        || viewer
            .user()
            .is_some_and(|auth| auth.can_manage(job.posted_by.as_deref()));
    if !can_see {
        return Err(AppError::not_found("Job", id));
    }
    Ok(Json(DataResponse::success("Job found", job)))
}

pub async fn create_job_handler(
    request: Json<CreateJobRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<(Status, Json<DataResponse<Job>>)> {
    if !auth.role().can_post_jobs() {
        return Err(AppError::Forbidden(
            "Only employers and admins can post jobs".to_string(),
        ));
    }

    let mut request = request.into_inner();
    request.validate().map_err(AppError::Validation)?;

    if let Some(company_id) = &request.company_id {
        let company = resolve_company(database, company_id).await?;
        if request.company_name.is_none() {
            request.company_name = Some(company.name);
        }
    }

    let job = Job::new(request, JobSource::Manual, Some(auth.id().to_string()));
    JobRepository::new(database.pool()).insert(&job).await?;

    info!("User {} posted job {}", auth.email(), job.id);
    Ok((Status::Created, Json(DataResponse::success("Job created", job))))
}

pub async fn update_job_handler(
    id: &str,
    request: Json<UpdateJobRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Job>>> {
    let mut job = load_job(database, id).await?;
    require_owner(&auth, &job)?;

    let mut request = request.into_inner();
    if let Some(company_id) = &request.company_id {
        let company = resolve_company(database, company_id).await?;
        if request.company_name.is_none() {
            request.company_name = Some(company.name);
        }
    }

    request.apply(&mut job).map_err(AppError::Validation)?;
    JobRepository::new(database.pool()).update(&job).await?;

    Ok(Json(DataResponse::success("Job updated", job)))
}

pub async fn delete_job_handler(
    id: &str,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<ActionResponse>> {
    let job = load_job(database, id).await?;
    require_owner(&auth, &job)?;

    JobRepository::new(database.pool()).delete(&job.id).await?;
    info!("User {} deleted job {}", auth.email(), job.id);

    Ok(Json(
        ActionResponse::success(format!("Job {} deleted", job.id), "delete_job")
            .with_next_actions(vec!["list_jobs".to_string(), "create_job".to_string()]),
    ))
}

pub async fn job_applications_handler(
    id: &str,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Vec<Application>>>> {
    let job = load_job(database, id).await?;
    require_owner(&auth, &job)?;

    let applications = ApplicationRepository::new(database.pool())
        .list_for_job(&job.id)
        .await?;
    Ok(Json(DataResponse::success(
        format!("{} applications", applications.len()),
        applications,
    )))
}
