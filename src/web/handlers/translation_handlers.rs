// src/web/handlers/translation_handlers.rs
use rocket::serde::json::Json;
use rocket::State;

use crate::database::{Database, JobRepository};
use crate::error::{AppError, AppResult};
use crate::translation::{LanguageDetection, TranslatedJob, Translation, TranslationClient};
use crate::web::types::{
    DataResponse, DetectLanguageRequest, TranslateJobRequest, TranslateTextRequest,
};

fn require_configured(client: &TranslationClient) -> AppResult<()> {
    if client.is_configured() {
        Ok(())
    } else {
        Err(AppError::Configuration(
            "Translation service is not configured".to_string(),
        ))
    }
}

fn require_text(text: &str, field: &str) -> AppResult<()> {
    if text.trim().is_empty() {
        Err(AppError::Validation(format!("{} cannot be empty", field)))
    } else {
        Ok(())
    }
}

pub async fn translate_text_handler(
    request: Json<TranslateTextRequest>,
    client: &State<TranslationClient>,
) -> AppResult<Json<DataResponse<Translation>>> {
    require_text(&request.text, "text")?;
    require_text(&request.target_language, "target_language")?;
    require_configured(client)?;

    let translation = client
        .translate(
            &request.text,
            &request.target_language,
            request.source_language.as_deref(),
        )
        .await
        .map_err(AppError::external)?;

    Ok(Json(DataResponse::success(
        format!("Translated to {}", translation.target_language),
        translation,
    )))
}

pub async fn detect_language_handler(
    request: Json<DetectLanguageRequest>,
    client: &State<TranslationClient>,
) -> AppResult<Json<DataResponse<LanguageDetection>>> {
    require_text(&request.text, "text")?;
    require_configured(client)?;

    let detection = client
        .detect_language(&request.text)
        .await
        .map_err(AppError::external)?;

    Ok(Json(DataResponse::success(
        format!("Detected {}", detection.language),
        detection,
    )))
}

pub async fn translate_job_handler(
    job_id: &str,
    request: Json<TranslateJobRequest>,
    client: &State<TranslationClient>,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<TranslatedJob>>> {
    require_text(&request.target_language, "target_language")?;
    require_configured(client)?;

    let job = JobRepository::new(database.pool())
        .find_by_id(job_id)
        .await?
        .ok_or_else(|| AppError::not_found("Job", job_id))?;

    let translated = client
        .translate_job(&job, &request.target_language)
        .await
        .map_err(AppError::external)?;

    Ok(Json(DataResponse::success(
        format!("Job translated to {}", translated.target_language),
        translated,
    )))
}
