// src/translation.rs
//! Google Translate v2 REST client

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use crate::config::TranslationConfig;
use crate::models::Job;
use crate::utils::normalize_language;

const TRANSLATE_ENDPOINT: &str = "/language/translate/v2";
const DETECT_ENDPOINT: &str = "/language/translate/v2/detect";

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a [String],
    target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    format: &'static str,
}

#[derive(Debug, Serialize)]
struct DetectRequest<'a> {
    q: [&'a str; 1],
}

#[derive(Debug, Deserialize)]
struct GoogleResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct TranslationsData {
    translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleTranslation {
    translated_text: String,
    detected_source_language: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetectionsData {
    detections: Vec<Vec<GoogleDetection>>,
}

#[derive(Debug, Deserialize)]
struct GoogleDetection {
    language: String,
    #[serde(default)]
    confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub translated_text: String,
    pub source_language: Option<String>,
    pub target_language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageDetection {
    pub language: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatedJob {
    pub job_id: String,
    pub target_language: String,
    pub source_language: Option<String>,
    pub title: String,
    pub description: String,
    pub requirements: Vec<String>,
}

pub struct TranslationClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl TranslationClient {
    pub fn new(config: &TranslationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .context("Google Translate API key is not configured")
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key()?)])
            .json(body)
            .send()
            .await
            .context("Failed to call translation service")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Translation service error response: {}", error_text);
            anyhow::bail!(
                "Translation service returned error status {}: {}",
                status,
                error_text
            );
        }

        let parsed: GoogleResponse<T> = response
            .json()
            .await
            .context("Failed to parse translation service response")?;
        Ok(parsed.data)
    }

    /// Translates each text in order; `source` of `None` lets the service detect it
    pub async fn translate_batch(
        &self,
        texts: &[String],
        target: &str,
        source: Option<&str>,
    ) -> Result<Vec<Translation>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let target = normalize_language(target);
        let source = source.map(normalize_language);
        let request = TranslateRequest {
            q: texts,
            target: target.clone(),
            source: source.clone(),
            format: "text",
        };

        info!("Translating {} text(s) to {}", texts.len(), target);
        let data: TranslationsData = self.post(TRANSLATE_ENDPOINT, &request).await?;

        if data.translations.len() != texts.len() {
            anyhow::bail!(
                "Translation service returned {} translations for {} texts",
                data.translations.len(),
                texts.len()
            );
        }

        Ok(data
            .translations
            .into_iter()
            .map(|t| Translation {
                translated_text: t.translated_text,
                source_language: t.detected_source_language.or_else(|| source.clone()),
                target_language: target.clone(),
            })
            .collect())
    }

    pub async fn translate(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> Result<Translation> {
        self.translate_batch(&[text.to_string()], target, source)
            .await?
            .into_iter()
            .next()
            .context("Translation service returned no translation")
    }

    pub async fn detect_language(&self, text: &str) -> Result<LanguageDetection> {
        let data: DetectionsData = self
            .post(DETECT_ENDPOINT, &DetectRequest { q: [text] })
            .await?;

        data.detections
            .into_iter()
            .flatten()
            .max_by(|a, b| a.confidence.total_cmp(&b.confidence))
            .map(|d| LanguageDetection {
                language: d.language,
                confidence: d.confidence,
            })
            .context("Translation service returned no detection")
    }

    /// Title, description and requirements in one call; nothing is stored
    pub async fn translate_job(&self, job: &Job, target: &str) -> Result<TranslatedJob> {
        let mut texts = vec![job.title.clone(), job.description.clone()];
        texts.extend(job.requirements.0.iter().cloned());

        let mut translations = self.translate_batch(&texts, target, None).await?.into_iter();
        let title = translations.next().context("Missing title translation")?;
        let description = translations
            .next()
            .context("Missing description translation")?;

        Ok(TranslatedJob {
            job_id: job.id.clone(),
            target_language: title.target_language,
            source_language: title.source_language,
            title: title.translated_text,
            description: description.translated_text,
            requirements: translations.map(|t| t.translated_text).collect(),
        })
    }
}
