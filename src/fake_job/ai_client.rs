// src/fake_job/ai_client.rs
use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

use super::detector::{AiVerdict, JobText, JobVerdictProvider};
use crate::config::OpenAiConfig;

const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";

const SYSTEM_PROMPT: &str = "You are a fraud analyst reviewing job postings. Decide whether \
the posting is fake or a scam. Answer with a JSON object of the form \
{\"is_fake\": boolean, \"confidence\": number between 0 and 1, \"reasons\": [string]}.";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .context("OpenAI API key is not configured")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_ENDPOINT);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: 0.0,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        info!("Requesting job verdict from {} ({})", url, self.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to OpenAI")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("OpenAI error response: {}", error_text);
            anyhow::bail!("OpenAI returned error status {}: {}", status, error_text);
        }

        let completion: ChatResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("OpenAI response contained no message content")
    }
}

#[rocket::async_trait]
impl JobVerdictProvider for OpenAiClient {
    async fn judge(&self, job: &JobText) -> Result<AiVerdict> {
        let content = self.complete(&job.to_prompt()).await?;
        parse_verdict(&content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Parses the model's JSON answer, tolerating markdown code fences
pub fn parse_verdict(content: &str) -> Result<AiVerdict> {
    let body = strip_code_fence(content);
    let mut verdict: AiVerdict = serde_json::from_str(body)
        .with_context(|| format!("Invalid verdict JSON from model: {}", content))?;
    verdict.confidence = verdict.confidence.clamp(0.0, 1.0);
    Ok(verdict)
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Any language tag on the opening line, in any case
    let rest = match rest.split_once('\n') {
        Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.trim().strip_suffix("```").unwrap_or(rest).trim()
}
