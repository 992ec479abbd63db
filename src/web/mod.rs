// src/web/mod.rs
pub mod activity;
pub mod handlers;
pub mod routes;
pub mod types;

pub use activity::ActivityLogger;
pub use types::*;

use crate::auth::{AuthConfig, AuthError, AuthFailure};
use crate::config::AppConfig;
use crate::crawler::LinkedInCrawler;
use crate::cv::CvServices;
use crate::database::Database;
use crate::fake_job::{self, FakeJobService};
use crate::translation::TranslationClient;
use anyhow::{Context, Result};
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::{catch, catchers, routes, Build, Request, Response, Rocket};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, PUT, PATCH, DELETE, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

fn error_body(error: &str, code: &str, suggestions: &[&str]) -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        error.to_string(),
        code.to_string(),
        suggestions.iter().map(|s| s.to_string()).collect(),
    ))
}

fn auth_failure(req: &Request<'_>) -> Option<AuthError> {
    req.local_cache(|| AuthFailure(None)).0
}

// Error catchers
#[catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    error_body(
        "Invalid request format",
        "BAD_REQUEST",
        &[
            "Check your request JSON format",
            "Verify all required fields are present",
        ],
    )
}

#[catch(401)]
pub fn unauthorized(req: &Request<'_>) -> Json<StandardErrorResponse> {
    let message = auth_failure(req)
        .map(|e| e.message())
        .unwrap_or("Authentication required");
    error_body(
        message,
        "UNAUTHORIZED",
        &["Log in and send the token as a Bearer header"],
    )
}

#[catch(403)]
pub fn forbidden(req: &Request<'_>) -> Json<StandardErrorResponse> {
    let message = auth_failure(req)
        .map(|e| e.message())
        .unwrap_or("Access denied");
    error_body(
        message,
        "FORBIDDEN",
        &["This action requires different permissions"],
    )
}

#[catch(404)]
pub fn not_found(req: &Request<'_>) -> Json<StandardErrorResponse> {
    error_body(
        &format!("No route for {} {}", req.method(), req.uri().path()),
        "NOT_FOUND",
        &["Check the request path"],
    )
}

#[catch(413)]
pub fn payload_too_large() -> Json<StandardErrorResponse> {
    error_body(
        "Request body is too large",
        "PAYLOAD_TOO_LARGE",
        &["CV uploads are limited to 10MB"],
    )
}

#[catch(422)]
pub fn unprocessable_entity() -> Json<StandardErrorResponse> {
    error_body(
        "Request body could not be parsed",
        "VALIDATION_ERROR",
        &["Check field names and types against the API documentation"],
    )
}

#[catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    error_body(
        "Internal server error",
        "INTERNAL_ERROR",
        &[
            "Try again in a few moments",
            "Contact support if the problem persists",
        ],
    )
}

/// JSON bodies up to 2MiB, multipart up to 11MiB (above the 10MB CV limit)
fn request_limits() -> Limits {
    Limits::default()
        .limit("json", 2.mebibytes())
        .limit("file", 11.mebibytes())
        .limit("data-form", 11.mebibytes())
}

/// Assemble the server with every managed service, without launching it
pub fn build_rocket(config: &AppConfig, database: Database) -> Result<Rocket<Build>> {
    let auth_config = AuthConfig::new(config.jwt_secret.clone(), config.token_ttl_hours);
    let detector = fake_job::build_detector(config)?;
    let fake_jobs = FakeJobService::new(detector, database.clone());
    let translation = TranslationClient::new(&config.translation)?;
    let cv_services = CvServices::new(config.cv_service_url.as_deref())?;
    let crawler = LinkedInCrawler::new(&config.linkedin_base_url)?;

    let figment = rocket::Config::figment()
        .merge(("port", config.port))
        .merge(("address", config.address.clone()))
        .merge(("limits", request_limits()))
        .merge(("log_level", rocket::config::LogLevel::Off));

    Ok(rocket::custom(figment)
        .attach(Cors)
        .attach(ActivityLogger)
        .manage(database)
        .manage(auth_config)
        .manage(fake_jobs)
        .manage(translation)
        .manage(cv_services)
        .manage(crawler)
        .register(
            "/",
            catchers![
                bad_request,
                unauthorized,
                forbidden,
                not_found,
                payload_too_large,
                unprocessable_entity,
                internal_error
            ],
        )
        .mount(
            "/",
            routes![
                routes::health,
                routes::options,
                routes::register,
                routes::login,
                routes::me,
                routes::list_jobs,
                routes::create_job,
                routes::get_job,
                routes::update_job,
                routes::delete_job,
                routes::job_applications,
                routes::list_companies,
                routes::create_company,
                routes::get_company,
                routes::update_company,
                routes::delete_company,
                routes::list_users,
                routes::get_user,
                routes::update_user,
                routes::delete_user,
                routes::apply,
                routes::my_applications,
                routes::update_application_status,
                routes::analyze_job_text,
                routes::analyze_stored_job,
                routes::latest_analysis,
                routes::analysis_statistics,
                routes::batch_analyze,
                routes::translate_text,
                routes::detect_language,
                routes::translate_job,
                routes::parse_cv,
                routes::upload_cv,
                routes::crawl_linkedin,
                routes::admin_logs,
                routes::admin_stats,
                routes::admin_dashboard,
            ],
        ))
}

// Main server start function
pub async fn start_web_server(config: AppConfig) -> Result<()> {
    config.ensure_directories().await?;

    let database = Database::new(&config.database_path).await?;
    database.migrate().await?;

    info!("Starting job board API server");
    info!("Database: {}", config.database_path.display());
    info!(
        "AI verification: {}",
        if config.openai.is_enabled() { "enabled" } else { "disabled" }
    );

    let _rocket = build_rocket(&config, database)?
        .launch()
        .await
        .context("Rocket server failed")?;

    Ok(())
}
