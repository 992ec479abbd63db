// src/models/company.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    pub fn new(request: CreateCompanyRequest, created_by: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            name: request.name.trim().to_string(),
            description: request.description,
            website: request.website,
            industry: request.industry,
            location: request.location,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
}

impl CreateCompanyRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Company name is required".to_string());
        }
        validate_website(self.website.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
}

impl UpdateCompanyRequest {
    pub fn apply(self, company: &mut Company) -> Result<(), String> {
        if let Some(name) = self.name {
            if name.trim().is_empty() {
                return Err("Company name cannot be empty".to_string());
            }
            company.name = name.trim().to_string();
        }
        validate_website(self.website.as_deref())?;
        if self.description.is_some() {
            company.description = self.description;
        }
        if self.website.is_some() {
            company.website = self.website;
        }
        if self.industry.is_some() {
            company.industry = self.industry;
        }
        if self.location.is_some() {
            company.location = self.location;
        }
        company.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_website(website: Option<&str>) -> Result<(), String> {
    match website {
        Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
            Err(format!("Website must be an http(s) URL: {}", url))
        }
        _ => Ok(()),
    }
}
