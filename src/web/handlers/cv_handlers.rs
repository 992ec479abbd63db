// src/web/handlers/cv_handlers.rs
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info};

use crate::auth::AuthenticatedUser;
use crate::cv::{self, CvServices, ParsedCv, MAX_CV_BYTES, SUPPORTED_EXTENSIONS};
use crate::error::{AppError, AppResult};
use crate::utils::{get_file_extension, validate_file_extension};
use crate::web::types::{CvUploadForm, DataResponse, ParseCvRequest};

fn parsed_message(parsed: &ParsedCv) -> String {
    format!("CV parsed, {} skills found", parsed.skills.len())
}

pub async fn parse_cv_handler(
    request: Json<ParseCvRequest>,
    auth: AuthenticatedUser,
    services: &State<CvServices>,
) -> AppResult<Json<DataResponse<ParsedCv>>> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("CV text cannot be empty".to_string()));
    }

    info!("User {} parsing CV text", auth.email());
    let parsed = services.parser.parse(&request.text);
    Ok(Json(DataResponse::success(parsed_message(&parsed), parsed)))
}

/// Extension from the client file name, falling back to the part's content type
fn upload_extension(upload: &CvUploadForm<'_>) -> Option<String> {
    let from_name = upload
        .cv_file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str())
        .and_then(get_file_extension);
    if from_name.is_some() {
        return from_name;
    }

    let content_type = upload.cv_file.content_type()?;
    if content_type.is_pdf() {
        Some("pdf".to_string())
    } else if content_type.is_text() || content_type.is_plain() {
        Some("txt".to_string())
    } else if content_type
        .to_string()
        .contains("vnd.openxmlformats-officedocument.wordprocessingml.document")
    {
        Some("docx".to_string())
    } else {
        None
    }
}

pub async fn upload_cv_handler(
    mut upload: Form<CvUploadForm<'_>>,
    auth: AuthenticatedUser,
    services: &State<CvServices>,
) -> AppResult<Json<DataResponse<ParsedCv>>> {
    let file_size = upload.cv_file.len();
    if file_size == 0 {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if file_size > MAX_CV_BYTES {
        return Err(AppError::BadRequest(
            "File size exceeds 10MB limit".to_string(),
        ));
    }

    let extension = upload_extension(&upload).ok_or_else(|| {
        AppError::Validation(format!(
            "Unsupported file type. Allowed: {}",
            SUPPORTED_EXTENSIONS.join(", ")
        ))
    })?;
    let file_name = format!("cv.{}", extension);
    validate_file_extension(&file_name, SUPPORTED_EXTENSIONS)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    info!(
        "User {} uploading {} CV ({} bytes)",
        auth.email(),
        extension,
        file_size
    );

    let temp_path = std::env::temp_dir().join(format!("cv_upload_{}", uuid::Uuid::new_v4()));
    upload.cv_file.copy_to(&temp_path).await.map_err(|e| {
        error!("Failed to save uploaded file: {}", e);
        AppError::Internal(anyhow::anyhow!("Failed to store upload: {}", e))
    })?;
    let content = tokio::fs::read(&temp_path).await;
    let _ = tokio::fs::remove_file(&temp_path).await;
    let content =
        content.map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read upload: {}", e)))?;

    let text = if cv::needs_extraction_service(&extension) {
        let extractor = services.extractor.as_ref().ok_or_else(|| {
            AppError::Configuration(format!(
                "No text extraction service configured for .{} files",
                extension
            ))
        })?;
        extractor
            .extract_text(&file_name, content)
            .await
            .map_err(AppError::external)?
    } else {
        cv::decode_text(&content)
    };

    if text.trim().is_empty() {
        return Err(AppError::Validation(
            "No text could be extracted from the CV".to_string(),
        ));
    }

    let parsed = services.parser.parse(&text);
    Ok(Json(DataResponse::success(parsed_message(&parsed), parsed)))
}
