//! Modelo de entrada de auditoría
//!
//! Las filas de audit_log son inmutables: la aplicación solo inserta.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resultado registrado de la acción auditada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Failure,
    Warning,
    Info,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Success => "success",
            AuditStatus::Failure => "failure",
            AuditStatus::Warning => "warning",
            AuditStatus::Info => "info",
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuditLogEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<Uuid>,
    pub status: String,
    pub user_id: Option<Uuid>,
    pub user_username: String,
    pub details: Option<serde_json::Value>,
}
