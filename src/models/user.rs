// src/models/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use std::fmt;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Length is counted in characters, not bytes
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
pub enum UserRole {
    JobSeeker,
    Employer,
    Admin,
}

impl UserRole {
    pub fn can_post_jobs(&self) -> bool {
        matches!(self, UserRole::Employer | UserRole::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserRole::JobSeeker => "job_seeker",
            UserRole::Employer => "employer",
            UserRole::Admin => "admin",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub skills: Json<Vec<String>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, full_name: &str, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            email: normalize_email(email),
            full_name: full_name.trim().to_string(),
            password_hash,
            role,
            skills: Json(Vec::new()),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// User as exposed over the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    pub skills: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            skills: user.skills.0,
            is_active: user.is_active,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default = "default_role")]
    pub role: UserRole,
}

fn default_role() -> UserRole {
    UserRole::JobSeeker
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !looks_like_email(&self.email) {
            return Err(format!("Invalid email address: {}", self.email));
        }
        validate_password(&self.password)?;
        if self.full_name.trim().is_empty() {
            return Err("Full name is required".to_string());
        }
        if self.role == UserRole::Admin {
            return Err("Admin accounts cannot be self-registered".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub skills: Option<Vec<String>>,
    pub password: Option<String>,
    /// Admin only
    pub role: Option<UserRole>,
    /// Admin only
    pub is_active: Option<bool>,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(email: &str, password: &str, role: UserRole) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: "Ada Lovelace".to_string(),
            role,
        }
    }

    #[test]
    fn test_register_validation() {
        assert!(register("ada@example.com", "supersecret", UserRole::JobSeeker)
            .validate()
            .is_ok());
        assert!(register("not-an-email", "supersecret", UserRole::JobSeeker)
            .validate()
            .is_err());
        assert!(register("ada@example.com", "short", UserRole::Employer)
            .validate()
            .is_err());
        assert!(register("ada@example.com", "supersecret", UserRole::Admin)
            .validate()
            .is_err());
    }

    #[test]
    fn test_new_user_normalizes_email() {
        let user = User::new(" Ada@Example.COM ", "Ada", "hash".to_string(), UserRole::Employer);
        assert_eq!(user.email, "ada@example.com");
        assert!(user.role.can_post_jobs());
        assert!(!user.is_admin());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User::new("ada@example.com", "Ada", "secret-hash".to_string(), UserRole::JobSeeker);
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
