//! Repositorio de la bitácora de auditoría
//!
//! Solo inserta y consulta; no existe update ni delete sobre audit_log.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::audit::AuditLogEntry;
use crate::utils::errors::AppError;

/// Filtros opcionales del listado administrativo
#[derive(Debug, Default, Clone)]
pub struct AuditLogFilter {
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<Uuid>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: &AuditLogEntry) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO audit_log (id, timestamp, action, entity_type, entity_id, status, user_id, user_username, details)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(entry.id)
        .bind(entry.timestamp)
        .bind(&entry.action)
        .bind(&entry.entity_type)
        .bind(entry.entity_id)
        .bind(&entry.status)
        .bind(entry.user_id)
        .bind(&entry.user_username)
        .bind(&entry.details)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn search(
        &self,
        filter: &AuditLogFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditLogEntry>, AppError> {
        let entries = sqlx::query_as::<_, AuditLogEntry>(
            r#"
            SELECT * FROM audit_log
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR user_username ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR action ILIKE '%' || $3 || '%')
              AND ($4::text IS NULL OR entity_type ILIKE '%' || $4 || '%')
              AND ($5::uuid IS NULL OR entity_id = $5)
              AND ($6::timestamptz IS NULL OR timestamp >= $6)
              AND ($7::timestamptz IS NULL OR timestamp <= $7)
            ORDER BY timestamp DESC
            LIMIT $8 OFFSET $9
            "#,
        )
        .bind(filter.user_id)
        .bind(&filter.username)
        .bind(&filter.action)
        .bind(&filter.entity_type)
        .bind(filter.entity_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn count(&self, filter: &AuditLogFilter) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM audit_log
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::text IS NULL OR user_username ILIKE '%' || $2 || '%')
              AND ($3::text IS NULL OR action ILIKE '%' || $3 || '%')
              AND ($4::text IS NULL OR entity_type ILIKE '%' || $4 || '%')
              AND ($5::uuid IS NULL OR entity_id = $5)
              AND ($6::timestamptz IS NULL OR timestamp >= $6)
              AND ($7::timestamptz IS NULL OR timestamp <= $7)
            "#,
        )
        .bind(filter.user_id)
        .bind(&filter.username)
        .bind(&filter.action)
        .bind(&filter.entity_type)
        .bind(filter.entity_id)
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
