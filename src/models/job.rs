// src/models/job.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Contract,
    Internship,
    Remote,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Remote => "remote",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "full_time" | "fulltime" => Ok(JobType::FullTime),
            "part_time" | "parttime" => Ok(JobType::PartTime),
            "contract" => Ok(JobType::Contract),
            "internship" => Ok(JobType::Internship),
            "remote" => Ok(JobType::Remote),
            other => Err(format!("Unknown job type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum JobSource {
    Manual,
    Linkedin,
    Import,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    pub description: String,
    pub requirements: Json<Vec<String>>,
    pub location: Option<String>,
    pub job_type: JobType,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub contact_email: Option<String>,
    pub source: JobSource,
    pub source_url: Option<String>,
    pub posted_by: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(request: CreateJobRequest, source: JobSource, posted_by: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            title: request.title.trim().to_string(),
            company_id: request.company_id,
            company_name: request.company_name.map(|name| name.trim().to_string()),
            description: request.description,
            requirements: Json(request.requirements),
            location: request.location,
            job_type: request.job_type,
            salary_min: request.salary_min,
            salary_max: request.salary_max,
            salary_currency: request.salary_currency,
            contact_email: request.contact_email,
            source,
            source_url: request.source_url,
            posted_by,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user_id` posted this job
    pub fn is_posted_by(&self, user_id: &str) -> bool {
        self.posted_by.as_deref() == Some(user_id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub job_type: JobType,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub contact_email: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
}

impl CreateJobRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Job title is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("Job description is required".to_string());
        }
        validate_salary(self.salary_min, self.salary_max)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<Vec<String>>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub salary_currency: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateJobRequest {
    /// Replace the fields present in the request
    pub fn apply(self, job: &mut Job) -> Result<(), String> {
        if let Some(title) = self.title {
            if title.trim().is_empty() {
                return Err("Job title cannot be empty".to_string());
            }
            job.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            if description.trim().is_empty() {
                return Err("Job description cannot be empty".to_string());
            }
            job.description = description;
        }
        if self.company_id.is_some() {
            job.company_id = self.company_id;
        }
        if self.company_name.is_some() {
            job.company_name = self.company_name;
        }
        if let Some(requirements) = self.requirements {
            job.requirements = Json(requirements);
        }
        if self.location.is_some() {
            job.location = self.location;
        }
        if let Some(job_type) = self.job_type {
            job.job_type = job_type;
        }
        if self.salary_min.is_some() {
            job.salary_min = self.salary_min;
        }
        if self.salary_max.is_some() {
            job.salary_max = self.salary_max;
        }
        if self.salary_currency.is_some() {
            job.salary_currency = self.salary_currency;
        }
        if self.contact_email.is_some() {
            job.contact_email = self.contact_email;
        }
        if let Some(is_active) = self.is_active {
            job.is_active = is_active;
        }

        validate_salary(job.salary_min, job.salary_max)?;
        job.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_salary(min: Option<f64>, max: Option<f64>) -> Result<(), String> {
    if min.is_some_and(|v| v < 0.0) || max.is_some_and(|v| v < 0.0) {
        return Err("Salary values cannot be negative".to_string());
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct JobFilter {
    pub q: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<JobType>,
    pub company_id: Option<String>,
    pub active_only: bool,
}

impl Default for JobFilter {
    fn default() -> Self {
        Self {
            q: None,
            location: None,
            job_type: None,
            company_id: None,
            active_only: true,
        }
    }
}
