// src/web/handlers/auth_handlers.rs
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

use crate::auth::{hash_password, verify_password, AuthConfig, AuthenticatedUser};
use crate::database::{Database, UserRepository};
use crate::error::{AppError, AppResult};
use crate::models::{PublicUser, RegisterRequest, User};
use crate::web::types::{AuthTokenData, DataResponse, LoginRequest};

fn token_data(auth_config: &AuthConfig, user: User) -> AppResult<AuthTokenData> {
    let token = auth_config.issue_token(&user)?;
    Ok(AuthTokenData {
        token,
        token_type: "Bearer",
        expires_in_hours: auth_config.token_ttl_hours(),
        user: user.into(),
    })
}

pub async fn register_handler(
    request: Json<RegisterRequest>,
    database: &State<Database>,
    auth_config: &State<AuthConfig>,
) -> AppResult<(Status, Json<DataResponse<AuthTokenData>>)> {
    let request = request.into_inner();
    request.validate().map_err(AppError::Validation)?;

    let users = UserRepository::new(database.pool());
    if users.find_by_email(&request.email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "Email already registered: {}",
            request.email.trim()
        )));
    }

    let password_hash = hash_password(&request.password)?;
    let user = User::new(&request.email, &request.full_name, password_hash, request.role);
    users.insert(&user).await?;

    info!("Registered {} as {}", user.email, user.role);
    let data = token_data(auth_config, user)?;
    Ok((
        Status::Created,
        Json(DataResponse::success("Registration successful", data)),
    ))
}

pub async fn login_handler(
    request: Json<LoginRequest>,
    database: &State<Database>,
    auth_config: &State<AuthConfig>,
) -> AppResult<Json<DataResponse<AuthTokenData>>> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let user = UserRepository::new(database.pool())
        .find_by_email(&request.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&request.password, &user.password_hash) {
        warn!("Failed login for {}", user.email);
        return Err(invalid());
    }
    if !user.is_active {
        return Err(AppError::Forbidden("User account is deactivated".to_string()));
    }

    info!("User {} logged in", user.email);
    let data = token_data(auth_config, user)?;
    Ok(Json(DataResponse::success("Login successful", data)))
}

pub async fn me_handler(auth: AuthenticatedUser) -> Json<DataResponse<PublicUser>> {
    Json(DataResponse::success(
        "Current user",
        PublicUser::from(auth.user),
    ))
}
