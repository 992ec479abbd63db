// src/web/types.rs
use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Data,
    Action,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_actions: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

impl<T> DataResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message: message.into(),
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message: message.into(),
            action: action.into(),
            next_actions: None,
        }
    }

    pub fn with_next_actions(mut self, next_actions: Vec<String>) -> Self {
        self.next_actions = Some(next_actions);
        self
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
        }
    }
}

/// `page`/`limit` query parameters shared by list endpoints
#[derive(Debug, Clone, Copy, Default)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    pub fn pagination(&self) -> crate::models::Pagination {
        crate::models::Pagination::new(self.page, self.limit)
    }
}

#[derive(Debug, Default)]
pub struct JobQuery {
    pub q: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub company_id: Option<String>,
    pub active_only: Option<bool>,
}

#[derive(Debug, Default)]
pub struct LogQuery {
    pub user_id: Option<String>,
    pub path_prefix: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct AuthTokenData {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in_hours: i64,
    pub user: crate::models::PublicUser,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct AnalyzeJobTextRequest {
    #[serde(flatten)]
    pub job: crate::fake_job::JobText,
    #[serde(default = "default_use_ai")]
    pub use_ai: bool,
}

#[derive(Deserialize, Default)]
#[serde(crate = "rocket::serde")]
pub struct AnalyzeOptions {
    #[serde(default = "default_use_ai")]
    pub use_ai: bool,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct BatchAnalyzeRequest {
    #[serde(default = "default_batch_limit")]
    pub limit: u32,
    #[serde(default)]
    pub use_ai: bool,
}

fn default_use_ai() -> bool {
    true
}

fn default_batch_limit() -> u32 {
    50
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct TranslateTextRequest {
    pub text: String,
    pub target_language: String,
    #[serde(default)]
    pub source_language: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct DetectLanguageRequest {
    pub text: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct TranslateJobRequest {
    pub target_language: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ParseCvRequest {
    pub text: String,
}

#[derive(FromForm)]
pub struct CvUploadForm<'f> {
    pub cv_file: TempFile<'f>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthData {
    pub status: &'static str,
    pub database: &'static str,
    pub ai_enabled: bool,
    pub translation_enabled: bool,
    pub version: &'static str,
}
