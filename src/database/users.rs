// src/database/users.rs
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use crate::models::{Page, Pagination, User};

const USER_COLUMNS: &str =
    "id, email, full_name, password_hash, role, skills, is_active, created_at, updated_at";

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, full_name, password_hash, role, skills, is_active,
                created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.skills)
        .bind(user.is_active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(self.pool)
        .await
        .context("Failed to insert user")?;

        info!("Created user {} ({}) with role {}", user.id, user.email, user.role);
        Ok(())
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ?",
            USER_COLUMNS
        ))
        .bind(crate::models::user::normalize_email(email))
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    pub async fn list(&self, pagination: Pagination) -> Result<Page<User>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;

        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users ORDER BY created_at ASC, id ASC LIMIT ? OFFSET ?",
            USER_COLUMNS
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(Page::new(users, total, pagination))
    }

    pub async fn update(&self, user: &User) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET full_name = ?, password_hash = ?, role = ?, skills = ?, is_active = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .bind(user.role)
        .bind(&user.skills)
        .bind(user.is_active)
        .bind(user.updated_at)
        .bind(&user.id)
        .execute(self.pool)
        .await
        .context("Failed to update user")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .context("Failed to delete user")?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!("Deleted user {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;
    use crate::models::UserRole;

    #[tokio::test]
    async fn test_find_by_email_is_case_insensitive() {
        let (db, _dir) = temp_database().await;
        let repo = UserRepository::new(db.pool());

        let user = User::new("ada@example.com", "Ada", "hash".to_string(), UserRole::Employer);
        repo.insert(&user).await.unwrap();

        let found = repo.find_by_email("ADA@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(found.role, UserRole::Employer);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let (db, _dir) = temp_database().await;
        let repo = UserRepository::new(db.pool());

        let first = User::new("ada@example.com", "Ada", "hash".to_string(), UserRole::JobSeeker);
        let second = User::new("ada@example.com", "Ada 2", "hash".to_string(), UserRole::JobSeeker);
        repo.insert(&first).await.unwrap();
        assert!(repo.insert(&second).await.is_err());
    }

    #[tokio::test]
    async fn test_update_persists_skills() {
        let (db, _dir) = temp_database().await;
        let repo = UserRepository::new(db.pool());

        let mut user = User::new("ada@example.com", "Ada", "hash".to_string(), UserRole::JobSeeker);
        repo.insert(&user).await.unwrap();

        user.skills.0 = vec!["Rust".to_string(), "SQL".to_string()];
        assert!(repo.update(&user).await.unwrap());

        let found = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(found.skills.0, vec!["Rust", "SQL"]);
    }
}
