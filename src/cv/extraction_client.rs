// src/cv/extraction_client.rs
use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};

const EXTRACT_TEXT_ENDPOINT: &str = "/extract-text";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
struct ExtractTextResponse {
    text: String,
}

/// Client for the document-to-text service used for PDF and DOCX uploads
pub struct CvExtractionClient {
    client: Client,
    base_url: String,
}

impl CvExtractionClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn extract_text(&self, file_name: &str, content: Vec<u8>) -> Result<String> {
        let content_type = content_type(file_name)?;
        let url = format!("{}{}", self.base_url, EXTRACT_TEXT_ENDPOINT);

        let form = Form::new().part(
            "file",
            Part::bytes(content)
                .file_name(file_name.to_string())
                .mime_str(content_type)
                .context("Failed to create multipart")?,
        );

        info!("Calling CV text extraction service: {}", url);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .context("Failed to call CV extraction service")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("CV extraction service error response: {}", error_text);
            anyhow::bail!("Service returned error status {}: {}", status, error_text);
        }

        let extracted: ExtractTextResponse = response
            .json()
            .await
            .context("Failed to parse CV extraction response")?;
        Ok(extracted.text)
    }
}

fn content_type(file_name: &str) -> Result<&'static str> {
    match crate::utils::get_file_extension(file_name).as_deref() {
        Some("pdf") => Ok("application/pdf"),
        Some("docx") => {
            Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        Some("txt") => Ok("text/plain"),
        _ => anyhow::bail!("Unsupported file type: {}", file_name),
    }
}
