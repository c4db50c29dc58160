use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::audit::AuditLogEntry;

/// Query params del listado administrativo. Los nombres son los del
/// contrato histórico: paginación en snake_case, filtros en camelCase.
#[derive(Debug, Default, Deserialize)]
pub struct AuditLogQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "userUsername")]
    pub user_username: Option<String>,
    pub action: Option<String>,
    #[serde(rename = "entityType")]
    pub entity_type: Option<String>,
    #[serde(rename = "entityId")]
    pub entity_id: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntryResponse {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<String>,
    pub status: String,
    pub user_id: Option<String>,
    pub user_username: String,
    pub details: Option<serde_json::Value>,
}

impl From<AuditLogEntry> for AuditLogEntryResponse {
    fn from(entry: AuditLogEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            timestamp: entry.timestamp,
            action: entry.action,
            entity_type: entry.entity_type,
            entity_id: entry.entity_id.map(|id| id.to_string()),
            status: entry.status,
            user_id: entry.user_id.map(|id| id.to_string()),
            user_username: entry.user_username,
            details: entry.details,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuditLogPageResponse {
    pub logs: Vec<AuditLogEntryResponse>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    #[serde(rename = "totalPages")]
    pub total_pages: i64,
}
