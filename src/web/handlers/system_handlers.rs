// src/web/handlers/system_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::error;

use crate::database::Database;
use crate::fake_job::FakeJobService;
use crate::translation::TranslationClient;
use crate::web::types::{DataResponse, HealthData};

pub async fn health_handler(
    database: &State<Database>,
    fake_jobs: &State<FakeJobService>,
    translation: &State<TranslationClient>,
) -> (Status, Json<DataResponse<HealthData>>) {
    let (status, database_state, message) = match database.health_check().await {
        Ok(()) => (Status::Ok, "ok", "Service is healthy"),
        Err(e) => {
            error!("Health check failed: {:#}", e);
            (
                Status::ServiceUnavailable,
                "unavailable",
                "Database is unavailable",
            )
        }
    };

    let data = HealthData {
        status: if status == Status::Ok { "ok" } else { "degraded" },
        database: database_state,
        ai_enabled: fake_jobs.detector().has_ai(),
        translation_enabled: translation.is_configured(),
        version: env!("CARGO_PKG_VERSION"),
    };

    (status, Json(DataResponse::success(message, data)))
}
