//! Modelo de cliente

use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Client {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub cin: String,
    pub email: Option<String>,
    pub driver_license_number: String,
    pub notes: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub registered_by: Option<Uuid>,
}

/// Proyección mínima para lecturas desnormalizadas de reservas
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ClientSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
}
