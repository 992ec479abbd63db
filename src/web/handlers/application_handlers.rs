// src/web/handlers/application_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::auth::AuthenticatedUser;
use crate::database::{ApplicationRepository, Database, JobRepository};
use crate::error::{AppError, AppResult};
use crate::models::{Application, CreateApplicationRequest, UpdateApplicationStatusRequest};
use crate::web::types::DataResponse;

pub async fn apply_handler(
    request: Json<CreateApplicationRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<(Status, Json<DataResponse<Application>>)> {
    let request = request.into_inner();

    let job = JobRepository::new(database.pool())
        .find_by_id(&request.job_id)
        .await?
        .ok_or_else(|| AppError::not_found("Job", &request.job_id))?;
    if !job.is_active {
        return Err(AppError::Validation(format!(
            "Job {} is no longer accepting applications",
            job.id
        )));
    }

    let applications = ApplicationRepository::new(database.pool());
    if applications.exists(&job.id, auth.id()).await? {
        return Err(AppError::Conflict(format!(
            "You already applied to job {}",
            job.id
        )));
    }

    let application = Application::new(job.id, auth.id().to_string(), request.cover_letter);
    applications.insert(&application).await?;

    Ok((
        Status::Created,
        Json(DataResponse::success("Application submitted", application)),
    ))
}

pub async fn my_applications_handler(
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Vec<Application>>>> {
    let applications = ApplicationRepository::new(database.pool())
        .list_for_user(auth.id())
        .await?;
    Ok(Json(DataResponse::success(
        format!("{} applications", applications.len()),
        applications,
    )))
}

pub async fn update_application_status_handler(
    id: &str,
    request: Json<UpdateApplicationStatusRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Application>>> {
    let applications = ApplicationRepository::new(database.pool());
    let mut application = applications
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Application", id))?;

    let job = JobRepository::new(database.pool())
        .find_by_id(&application.job_id)
        .await?
        .ok_or_else(|| AppError::not_found("Job", &application.job_id))?;
    if !auth.can_manage(job.posted_by.as_deref()) {
        return Err(AppError::Forbidden(
            "Only the job poster or an admin can review applications".to_string(),
        ));
    }

    applications.update_status(&application.id, request.status).await?;
    application.status = request.status;
    application.updated_at = chrono::Utc::now();

    info!(
        "Application {} marked {:?} by {}",
        application.id,
        application.status,
        auth.email()
    );
    Ok(Json(DataResponse::success("Application updated", application)))
}
