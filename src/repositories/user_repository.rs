//! Repositorio de usuarios (managers y admins)

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::user::{User, UserSummary};
use crate::utils::errors::AppError;

#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub full_name: String,
    pub is_active: bool,
}

#[derive(Debug, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub full_name: Option<String>,
    pub is_active: Option<bool>,
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, role, full_name, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NULL)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.role)
        .bind(user.full_name)
        .bind(user.is_active)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Buscar un manager por id; no devuelve admins
    pub async fn find_manager(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND role = 'manager'")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(user)
    }

    pub async fn find_managers(&self) -> Result<Vec<User>, AppError> {
        let managers = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = 'manager' ORDER BY username ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(managers)
    }

    pub async fn summary(&self, id: Uuid) -> Result<Option<UserSummary>, AppError> {
        let summary = sqlx::query_as::<_, UserSummary>(
            "SELECT id, username, full_name FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    pub async fn username_exists(
        &self,
        username: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(username)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update_manager(&self, id: Uuid, changes: UserChanges) -> Result<User, AppError> {
        let current = self
            .find_manager(id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Manager not found or user is not a manager.".to_string())
            })?;

        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, password_hash = $3, full_name = $4, is_active = $5, updated_at = $6
            WHERE id = $1 AND role = 'manager'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.username.unwrap_or(current.username))
        .bind(changes.password_hash.unwrap_or(current.password_hash))
        .bind(changes.full_name.unwrap_or(current.full_name))
        .bind(changes.is_active.unwrap_or(current.is_active))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete_manager(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND role = 'manager'")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count_managers(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'manager'")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
