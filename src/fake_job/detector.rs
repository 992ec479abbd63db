// src/fake_job/detector.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use super::rules::{RuleCategory, RuleSet};
use crate::models::Job;

pub const RULE_WEIGHT: f64 = 0.6;
pub const AI_WEIGHT: f64 = 0.4;
pub const DEFAULT_SUSPICIOUS_THRESHOLD: f64 = 50.0;

const MAX_SCORE: f64 = 100.0;
const MIN_DESCRIPTION_CHARS: usize = 100;
const CAPITALS_MIN_LETTERS: usize = 20;
const CAPITALS_RATIO: f64 = 0.3;
const EXCLAMATION_LIMIT: usize = 3;
const IMPLAUSIBLE_SALARY: f64 = 1_000_000.0;

/// Job fields the detector looks at
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobText {
    pub title: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub salary_min: Option<f64>,
    #[serde(default)]
    pub salary_max: Option<f64>,
}

impl JobText {
    fn searchable(&self) -> String {
        let mut parts = vec![self.title.as_str(), self.description.as_str()];
        parts.extend(self.requirements.iter().map(String::as_str));
        if let Some(email) = &self.contact_email {
            parts.push(email);
        }
        parts.join("\n")
    }

    /// Plain-text rendering used as the AI prompt body
    pub fn to_prompt(&self) -> String {
        let mut prompt = format!("Title: {}\n", self.title);
        if let Some(company) = &self.company_name {
            prompt.push_str(&format!("Company: {}\n", company));
        }
        if self.salary_min.is_some() || self.salary_max.is_some() {
            prompt.push_str(&format!(
                "Salary: {} - {}\n",
                self.salary_min.map(|v| v.to_string()).unwrap_or_default(),
                self.salary_max.map(|v| v.to_string()).unwrap_or_default()
            ));
        }
        if let Some(email) = &self.contact_email {
            prompt.push_str(&format!("Contact: {}\n", email));
        }
        prompt.push_str(&format!("Description:\n{}\n", self.description));
        if !self.requirements.is_empty() {
            prompt.push_str(&format!("Requirements:\n- {}\n", self.requirements.join("\n- ")));
        }
        prompt
    }
}

impl From<&Job> for JobText {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            company_name: job.company_name.clone(),
            description: job.description.clone(),
            requirements: job.requirements.0.clone(),
            contact_email: job.contact_email.clone(),
            salary_min: job.salary_min,
            salary_max: job.salary_max,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    pub category: RuleCategory,
    pub description: String,
    pub matched_text: Option<String>,
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            RiskLevel::Low
        } else if score < 50.0 {
            RiskLevel::Medium
        } else if score < 75.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RuleAssessment {
    pub score: f64,
    pub red_flags: Vec<RedFlag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiVerdict {
    pub is_fake: bool,
    pub confidence: f64,
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl AiVerdict {
    /// Fake-likelihood on a 0-100 scale
    pub fn score(&self) -> f64 {
        let confidence = self.confidence.clamp(0.0, 1.0);
        if self.is_fake {
            confidence * 100.0
        } else {
            (1.0 - confidence) * 100.0
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    pub rule_score: f64,
    pub ai_score: Option<f64>,
    pub final_score: f64,
    pub risk_level: RiskLevel,
    pub is_suspicious: bool,
    pub red_flags: Vec<RedFlag>,
    pub ai_reasoning: Option<String>,
    pub ai_model: Option<String>,
    pub ai_error: Option<String>,
}

/// Second opinion from a language model
#[rocket::async_trait]
pub trait JobVerdictProvider: Send + Sync {
    async fn judge(&self, job: &JobText) -> Result<AiVerdict>;

    fn model_name(&self) -> &str;
}

#[derive(Clone)]
pub struct FakeJobDetector {
    rules: RuleSet,
    ai: Option<Arc<dyn JobVerdictProvider>>,
    threshold: f64,
}

impl FakeJobDetector {
    pub fn new(rules: RuleSet) -> Self {
        Self {
            rules,
            ai: None,
            threshold: DEFAULT_SUSPICIOUS_THRESHOLD,
        }
    }

    pub fn with_ai(mut self, provider: Arc<dyn JobVerdictProvider>) -> Self {
        self.ai = Some(provider);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn has_ai(&self) -> bool {
        self.ai.is_some()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn assess_rules(&self, job: &JobText) -> RuleAssessment {
        let text = job.searchable();
        let mut red_flags = Vec::new();

        for rule in self.rules.rules() {
            if red_flags
                .iter()
                .any(|flag: &RedFlag| flag.category == rule.category)
            {
                continue;
            }
            if let Some(matched) = rule.first_match(&text) {
                red_flags.push(RedFlag {
                    category: rule.category,
                    description: rule.description.clone(),
                    matched_text: Some(matched.to_string()),
                    weight: rule.weight,
                });
            }
        }

        red_flags.extend(structural_flags(job));

        let score = red_flags
            .iter()
            .map(|flag| flag.weight)
            .sum::<f64>()
            .min(MAX_SCORE);

        RuleAssessment {
            score: round2(score),
            red_flags,
        }
    }

    pub async fn analyze(&self, job: &JobText, use_ai: bool) -> DetectionReport {
        let assessment = self.assess_rules(job);
        let rule_score = assessment.score;

        let mut ai_score = None;
        let mut ai_reasoning = None;
        let mut ai_model = None;
        let mut ai_error = None;

        if use_ai {
            if let Some(provider) = &self.ai {
                ai_model = Some(provider.model_name().to_string());
                match provider.judge(job).await {
                    Ok(verdict) => {
                        ai_score = Some(round2(verdict.score()));
                        if !verdict.reasons.is_empty() {
                            ai_reasoning = Some(verdict.reasons.join("; "));
                        }
                    }
                    Err(e) => {
                        warn!("AI verdict failed, using rule score only: {:#}", e);
                        ai_error = Some(format!("{:#}", e));
                    }
                }
            }
        }

        let final_score = match ai_score {
            Some(ai) => round2(RULE_WEIGHT * rule_score + AI_WEIGHT * ai),
            None => rule_score,
        };
        let risk_level = RiskLevel::from_score(final_score);

        info!(
            "Analyzed job '{}': rule={}, ai={:?}, final={}, risk={}",
            job.title, rule_score, ai_score, final_score, risk_level
        );

        DetectionReport {
            rule_score,
            ai_score,
            final_score,
            risk_level,
            is_suspicious: final_score >= self.threshold,
            red_flags: assessment.red_flags,
            ai_reasoning,
            ai_model,
            ai_error,
        }
    }
}

fn structural_flags(job: &JobText) -> Vec<RedFlag> {
    let mut flags = Vec::new();
    let mut flag = |category, description: &str, matched_text: Option<String>, weight| {
        flags.push(RedFlag {
            category,
            description: description.to_string(),
            matched_text,
            weight,
        })
    };

    if job
        .company_name
        .as_deref()
        .map_or(true, |name| name.trim().is_empty())
    {
        flag(RuleCategory::MissingCompany, "No company name given", None, 10.0);
    }

    let description = job.description.trim();
    if description.chars().count() < MIN_DESCRIPTION_CHARS {
        flag(
            RuleCategory::ShortDescription,
            "Description is unusually short",
            None,
            10.0,
        );
    }

    let letters: Vec<char> = description.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() >= CAPITALS_MIN_LETTERS {
        let upper = letters.iter().filter(|c| c.is_uppercase()).count();
        if upper as f64 / letters.len() as f64 > CAPITALS_RATIO {
            flag(
                RuleCategory::ExcessiveCapitals,
                "Description is mostly written in capitals",
                None,
                5.0,
            );
        }
    }

    let exclamations = job.title.matches('!').count() + description.matches('!').count();
    if exclamations >= EXCLAMATION_LIMIT {
        flag(
            RuleCategory::ExcessivePunctuation,
            "Excessive exclamation marks",
            Some("!".repeat(exclamations)),
            5.0,
        );
    }

    if let (Some(min), Some(max)) = (job.salary_min, job.salary_max) {
        if min > max {
            flag(
                RuleCategory::SalaryRangeInverted,
                "Minimum salary is above the maximum",
                Some(format!("{} > {}", min, max)),
                10.0,
            );
        }
    }

    if let Some(max) = job.salary_max.filter(|max| *max > IMPLAUSIBLE_SALARY) {
        flag(
            RuleCategory::ImplausibleSalary,
            "Salary is implausibly high",
            Some(max.to_string()),
            10.0,
        );
    }

    flags
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedVerdict(Result<AiVerdict, String>);

    #[rocket::async_trait]
    impl JobVerdictProvider for FixedVerdict {
        async fn judge(&self, _job: &JobText) -> Result<AiVerdict> {
            self.0.clone().map_err(|e| anyhow::anyhow!(e))
        }

        fn model_name(&self) -> &str {
            "fixed-model"
        }
    }

    fn detector() -> FakeJobDetector {
        FakeJobDetector::new(RuleSet::builtin().unwrap())
    }

    fn legit_job() -> JobText {
        JobText {
            title: "Senior Backend Engineer".to_string(),
            company_name: Some("Acme Analytics".to_string()),
            description: "We are looking for an engineer to design and operate our data \
                          ingestion services. You will work with Rust, PostgreSQL and Kafka \
                          alongside a team of eight engineers."
                .to_string(),
            requirements: vec!["5 years of backend experience".to_string()],
            contact_email: Some("careers@acme-analytics.com".to_string()),
            salary_min: Some(70_000.0),
            salary_max: Some(90_000.0),
        }
    }

    fn scam_job() -> JobText {
        JobText {
            title: "URGENT HIRING!!! Work from home".to_string(),
            company_name: None,
            description: "Pay a small registration fee and earn $500 per day. No experience \
                          needed. Contact us on WhatsApp and send your bank account details."
                .to_string(),
            requirements: vec![],
            contact_email: Some("recruiter.jobs@gmail.com".to_string()),
            salary_min: None,
            salary_max: None,
        }
    }

    #[test]
    fn test_legit_job_scores_zero() {
        let assessment = detector().assess_rules(&legit_job());
        assert_eq!(assessment.score, 0.0);
        assert!(assessment.red_flags.is_empty());
    }

    #[test]
    fn test_scam_job_is_capped_at_100() {
        let assessment = detector().assess_rules(&scam_job());
        assert_eq!(assessment.score, 100.0);

        let categories: Vec<RuleCategory> =
            assessment.red_flags.iter().map(|f| f.category).collect();
        assert!(categories.contains(&RuleCategory::UpfrontPayment));
        assert!(categories.contains(&RuleCategory::PersonalInfoRequest));
        assert!(categories.contains(&RuleCategory::FreeEmailDomain));
        assert!(categories.contains(&RuleCategory::MissingCompany));
        assert!(categories.contains(&RuleCategory::ExcessivePunctuation));
    }

    #[test]
    fn test_category_scores_once() {
        let mut job = legit_job();
        job.description.push_str(
            " There is a registration fee, a training fee and an upfront payment to start.",
        );
        let assessment = detector().assess_rules(&job);

        let upfront: Vec<&RedFlag> = assessment
            .red_flags
            .iter()
            .filter(|f| f.category == RuleCategory::UpfrontPayment)
            .collect();
        assert_eq!(upfront.len(), 1);
        assert_eq!(upfront[0].matched_text.as_deref(), Some("registration fee"));
        assert_eq!(assessment.score, 25.0);
    }

    #[test]
    fn test_structural_checks() {
        let job = JobText {
            title: "Assistant".to_string(),
            company_name: Some("  ".to_string()),
            description: "SHORT DESCRIPTION IN CAPITALS ONLY".to_string(),
            salary_min: Some(5_000_000.0),
            salary_max: Some(2_000_000.0),
            ..Default::default()
        };
        let assessment = detector().assess_rules(&job);
        let categories: Vec<RuleCategory> =
            assessment.red_flags.iter().map(|f| f.category).collect();

        assert_eq!(
            categories,
            vec![
                RuleCategory::MissingCompany,
                RuleCategory::ShortDescription,
                RuleCategory::ExcessiveCapitals,
                RuleCategory::SalaryRangeInverted,
                RuleCategory::ImplausibleSalary,
            ]
        );
        assert_eq!(assessment.score, 45.0);
    }

    #[test]
    fn test_capitals_need_enough_letters() {
        let job = JobText {
            title: "Clerk".to_string(),
            company_name: Some("Acme".to_string()),
            description: "OK GO".to_string(),
            ..Default::default()
        };
        let assessment = detector().assess_rules(&job);
        assert!(!assessment
            .red_flags
            .iter()
            .any(|f| f.category == RuleCategory::ExcessiveCapitals));
    }

    #[test]
    fn test_risk_levels() {
        assert_eq!(RiskLevel::from_score(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(24.99), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(25.0), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(50.0), RiskLevel::High);
        assert_eq!(RiskLevel::from_score(75.0), RiskLevel::Critical);
        assert_eq!(RiskLevel::from_score(100.0), RiskLevel::Critical);
    }

    #[test]
    fn test_ai_verdict_score() {
        let fake = AiVerdict {
            is_fake: true,
            confidence: 0.9,
            reasons: vec![],
        };
        let genuine = AiVerdict {
            is_fake: false,
            confidence: 0.9,
            reasons: vec![],
        };
        assert!((fake.score() - 90.0).abs() < 1e-9);
        assert!((genuine.score() - 10.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_analyze_without_ai_uses_rule_score() {
        let report = detector().analyze(&scam_job(), true).await;
        assert_eq!(report.final_score, report.rule_score);
        assert_eq!(report.ai_score, None);
        assert_eq!(report.ai_model, None);
        assert_eq!(report.risk_level, RiskLevel::Critical);
        assert!(report.is_suspicious);
    }

    #[tokio::test]
    async fn test_analyze_blends_ai_score() {
        let detector = detector().with_ai(Arc::new(FixedVerdict(Ok(AiVerdict {
            is_fake: true,
            confidence: 0.5,
            reasons: vec!["Vague duties".to_string(), "No company".to_string()],
        }))));

        let mut job = legit_job();
        job.company_name = None;
        let report = detector.analyze(&job, true).await;

        assert_eq!(report.rule_score, 10.0);
        assert_eq!(report.ai_score, Some(50.0));
        assert_eq!(report.final_score, 26.0);
        assert_eq!(report.risk_level, RiskLevel::Medium);
        assert!(!report.is_suspicious);
        assert_eq!(report.ai_reasoning.as_deref(), Some("Vague duties; No company"));
        assert_eq!(report.ai_model.as_deref(), Some("fixed-model"));
    }

    #[tokio::test]
    async fn test_ai_failure_is_recorded() {
        let detector =
            detector().with_ai(Arc::new(FixedVerdict(Err("service unavailable".to_string()))));
        let report = detector.analyze(&scam_job(), true).await;

        assert_eq!(report.ai_score, None);
        assert_eq!(report.final_score, report.rule_score);
        assert!(report.ai_error.unwrap().contains("service unavailable"));
    }

    #[tokio::test]
    async fn test_ai_skipped_when_not_requested() {
        let detector = detector().with_ai(Arc::new(FixedVerdict(Ok(AiVerdict {
            is_fake: true,
            confidence: 1.0,
            reasons: vec![],
        }))));
        let report = detector.analyze(&legit_job(), false).await;
        assert_eq!(report.ai_score, None);
        assert_eq!(report.final_score, 0.0);
    }

    #[test]
    fn test_custom_threshold() {
        let detector = detector().with_threshold(20.0);
        assert_eq!(detector.threshold(), 20.0);
    }
}
