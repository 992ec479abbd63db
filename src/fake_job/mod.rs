// src/fake_job/mod.rs
//! Scam-posting detection: regex rules, structural checks and an optional AI second opinion

pub mod ai_client;
pub mod detector;
pub mod rules;
pub mod service;

pub use ai_client::OpenAiClient;
pub use detector::{
    AiVerdict, DetectionReport, FakeJobDetector, JobText, JobVerdictProvider, RedFlag,
    RiskLevel, RuleAssessment,
};
pub use rules::{PatternRule, RuleCategory, RuleSet};
pub use service::{BatchSummary, FakeJobService};

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;

/// Detector with the configured rule catalog, threshold and AI client
pub fn build_detector(config: &AppConfig) -> Result<FakeJobDetector> {
    let rules = match &config.detector.rules_path {
        Some(path) => {
            info!("Loading fake job rules from {}", path.display());
            RuleSet::from_toml_file(path)?
        }
        None => RuleSet::builtin()?,
    };

    let mut detector =
        FakeJobDetector::new(rules).with_threshold(config.detector.suspicious_threshold);

    if config.openai.is_enabled() {
        let client = OpenAiClient::new(&config.openai)?;
        info!("AI verdicts enabled with model {}", config.openai.model);
        detector = detector.with_ai(Arc::new(client));
    } else {
        info!("No OpenAI key configured, fake job detection is rule-based only");
    }

    Ok(detector)
}
