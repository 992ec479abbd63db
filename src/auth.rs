// src/auth.rs
use anyhow::{Context, Result};
use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::database::{Database, UserRepository};
use crate::models::{User, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
}

pub struct AuthConfig {
    secret: String,
    token_ttl_hours: i64,
}

impl AuthConfig {
    pub fn new(secret: String, token_ttl_hours: i64) -> Self {
        Self {
            secret,
            token_ttl_hours,
        }
    }

    pub fn token_ttl_hours(&self) -> i64 {
        self.token_ttl_hours
    }

    pub fn issue_token(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(self.token_ttl_hours)).timestamp() as usize,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .context("Invalid or expired token")?;

        Ok(token_data.claims)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Raw token from an `Authorization: Bearer` header
pub fn bearer_token<'r>(req: &'r Request<'_>) -> Option<&'r str> {
    req.headers()
        .get_one("Authorization")
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    UserNotFound,
    UserInactive,
    NotAdmin,
    DatabaseError,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token required",
            AuthError::InvalidToken => "Invalid or expired authorization token",
            AuthError::UserNotFound => "User no longer exists",
            AuthError::UserInactive => "User account is deactivated",
            AuthError::NotAdmin => "Administrator access required",
            AuthError::DatabaseError => "Database error occurred",
        }
    }
}

/// Last guard failure for the current request, read by the error catchers
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthFailure(pub Option<AuthError>);

fn fail<T>(req: &Request<'_>, status: Status, error: AuthError) -> Outcome<T, AuthError> {
    req.local_cache(|| AuthFailure(Some(error)));
    Outcome::Error((status, error))
}

/// Valid bearer token belonging to an active user
pub struct AuthenticatedUser {
    pub user: User,
}

impl AuthenticatedUser {
    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }

    /// Admins may act on anything; everyone else only on their own records
    pub fn can_manage(&self, owner_id: Option<&str>) -> bool {
        self.is_admin() || owner_id == Some(self.id())
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => return fail(req, status, AuthError::DatabaseError),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let database = match req.guard::<&State<Database>>().await {
            Outcome::Success(database) => database,
            Outcome::Error((status, _)) => return fail(req, status, AuthError::DatabaseError),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let Some(token) = bearer_token(req) else {
            return fail(req, Status::Unauthorized, AuthError::MissingToken);
        };

        let claims = match auth_config.verify_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Token verification failed: {:#}", e);
                return fail(req, Status::Unauthorized, AuthError::InvalidToken);
            }
        };

        let user = match UserRepository::new(database.pool())
            .find_by_id(&claims.sub)
            .await
        {
            Ok(Some(user)) => user,
            Ok(None) => return fail(req, Status::Unauthorized, AuthError::UserNotFound),
            Err(e) => {
                error!("Failed to load user {}: {:#}", claims.sub, e);
                return fail(req, Status::InternalServerError, AuthError::DatabaseError);
            }
        };

        if !user.is_active {
            return fail(req, Status::Forbidden, AuthError::UserInactive);
        }

        Outcome::Success(AuthenticatedUser { user })
    }
}

pub struct AdminUser(pub AuthenticatedUser);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) if auth.is_admin() => Outcome::Success(AdminUser(auth)),
            Outcome::Success(auth) => {
                warn!("User {} attempted an admin action", auth.email());
                fail(req, Status::Forbidden, AuthError::NotAdmin)
            }
            Outcome::Error(e) => Outcome::Error(e),
            Outcome::Forward(f) => Outcome::Forward(f),
        }
    }
}

/// Authenticated user when a valid token is presented; never fails
pub struct OptionalAuth(pub Option<AuthenticatedUser>);

impl OptionalAuth {
    pub fn user(&self) -> Option<&AuthenticatedUser> {
        self.0.as_ref()
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        if bearer_token(req).is_none() {
            return Outcome::Success(OptionalAuth(None));
        }

        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) => Outcome::Success(OptionalAuth(Some(auth))),
            _ => Outcome::Success(OptionalAuth(None)),
        }
    }
}
