//! Repositorio de clientes

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::client::{Client, ClientSummary};
use crate::utils::errors::AppError;

#[derive(Debug)]
pub struct NewClient {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub cin: String,
    pub email: Option<String>,
    pub driver_license_number: String,
    pub notes: Option<String>,
    pub registered_by: Option<Uuid>,
}

#[derive(Debug, Default)]
pub struct ClientChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub cin: Option<String>,
    pub email: Option<String>,
    pub driver_license_number: Option<String>,
    pub notes: Option<String>,
}

pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, client: NewClient) -> Result<Client, AppError> {
        let created = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (id, first_name, last_name, phone, cin, email, driver_license_number, notes, registered_at, registered_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(client.first_name)
        .bind(client.last_name)
        .bind(client.phone)
        .bind(client.cin)
        .bind(client.email)
        .bind(client.driver_license_number)
        .bind(client.notes)
        .bind(Utc::now())
        .bind(client.registered_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Client>, AppError> {
        let client = sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(client)
    }

    /// Listado ordenado por apellido, como lo espera el frontend
    pub async fn find_all(&self) -> Result<Vec<Client>, AppError> {
        let clients =
            sqlx::query_as::<_, Client>("SELECT * FROM clients ORDER BY last_name ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(clients)
    }

    pub async fn summary(&self, id: Uuid) -> Result<Option<ClientSummary>, AppError> {
        let summary = sqlx::query_as::<_, ClientSummary>(
            "SELECT id, first_name, last_name, email, phone FROM clients WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    pub async fn phone_exists(&self, phone: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE phone = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(phone)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn cin_exists(&self, cin: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE cin = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(cin)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn email_exists(&self, email: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(&self, id: Uuid, changes: ClientChanges) -> Result<Client, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found.".to_string()))?;

        let updated = sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET first_name = $2, last_name = $3, phone = $4, cin = $5, email = $6,
                driver_license_number = $7, notes = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.first_name.unwrap_or(current.first_name))
        .bind(changes.last_name.unwrap_or(current.last_name))
        .bind(changes.phone.unwrap_or(current.phone))
        .bind(changes.cin.unwrap_or(current.cin))
        .bind(changes.email.or(current.email))
        .bind(
            changes
                .driver_license_number
                .unwrap_or(current.driver_license_number),
        )
        .bind(changes.notes.or(current.notes))
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    /// Últimos clientes registrados, para el dashboard del manager
    pub async fn recent(&self, limit: i64) -> Result<Vec<Client>, AppError> {
        let clients = sqlx::query_as::<_, Client>(
            "SELECT * FROM clients ORDER BY registered_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(clients)
    }
}
