// src/web/handlers/user_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use sqlx::types::Json as SqlJson;
use tracing::info;

use crate::auth::{hash_password, AdminUser, AuthenticatedUser};
use crate::database::{Database, UserRepository};
use crate::error::{AppError, AppResult};
use crate::models::user::validate_password;
use crate::models::{Page, PublicUser, UpdateUserRequest, User};
use crate::web::types::{ActionResponse, DataResponse, PageQuery};

async fn load_user(database: &Database, id: &str) -> AppResult<User> {
    UserRepository::new(database.pool())
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))
}

fn require_self_or_admin(auth: &AuthenticatedUser, user_id: &str) -> AppResult<()> {
    if auth.can_manage(Some(user_id)) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only access your own account".to_string(),
        ))
    }
}

pub async fn list_users_handler(
    _admin: AdminUser,
    page: PageQuery,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<Page<PublicUser>>>> {
    let users = UserRepository::new(database.pool())
        .list(page.pagination())
        .await?
        .map(PublicUser::from);
    Ok(Json(DataResponse::success(
        format!("Found {} users", users.total),
        users,
    )))
}

pub async fn get_user_handler(
    id: &str,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<PublicUser>>> {
    require_self_or_admin(&auth, id)?;
    let user = load_user(database, id).await?;
    Ok(Json(DataResponse::success("User found", user.into())))
}

pub async fn update_user_handler(
    id: &str,
    request: Json<UpdateUserRequest>,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<DataResponse<PublicUser>>> {
    require_self_or_admin(&auth, id)?;
    let request = request.into_inner();

    if (request.role.is_some() || request.is_active.is_some()) && !auth.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can change roles or account status".to_string(),
        ));
    }

    let mut user = load_user(database, id).await?;

    if let Some(full_name) = request.full_name {
        if full_name.trim().is_empty() {
            return Err(AppError::Validation("Full name cannot be empty".to_string()));
        }
        user.full_name = full_name.trim().to_string();
    }
    if let Some(skills) = request.skills {
        user.skills = SqlJson(skills);
    }
    if let Some(password) = request.password {
        validate_password(&password).map_err(AppError::Validation)?;
        user.password_hash = hash_password(&password)?;
    }
    if let Some(role) = request.role {
        user.role = role;
    }
    if let Some(is_active) = request.is_active {
        user.is_active = is_active;
    }
    user.updated_at = chrono::Utc::now();

    UserRepository::new(database.pool()).update(&user).await?;
    info!("User {} updated account {}", auth.email(), user.id);

    Ok(Json(DataResponse::success("User updated", user.into())))
}

pub async fn delete_user_handler(
    id: &str,
    auth: AuthenticatedUser,
    database: &State<Database>,
) -> AppResult<Json<ActionResponse>> {
    require_self_or_admin(&auth, id)?;
    let user = load_user(database, id).await?;

    UserRepository::new(database.pool()).delete(&user.id).await?;
    info!("User {} deleted account {}", auth.email(), user.email);

    Ok(Json(ActionResponse::success(
        format!("User {} deleted", user.email),
        "delete_user",
    )))
}
