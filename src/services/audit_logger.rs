//! Bitácora de auditoría
//!
//! Registra cada acción mutante como entrada inmutable. Un fallo al
//! escribir la bitácora se loguea y se traga: auditar nunca aborta la
//! operación de negocio que lo disparó.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::audit::{AuditLogEntry, AuditStatus};
use crate::models::auth::Actor;
use crate::repositories::audit_log_repository::AuditLogRepository;

/// Actor registrado cuando no hay sesión activa
pub const SYSTEM_ACTOR: &str = "system";

pub struct AuditLogger {
    repository: AuditLogRepository,
}

impl AuditLogger {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AuditLogRepository::new(pool),
        }
    }

    /// Registrar una acción. `actor` explícito gana; sin actor se
    /// atribuye al literal "system".
    pub async fn record(
        &self,
        action: &str,
        entity_type: &str,
        entity_id: Option<Uuid>,
        status: AuditStatus,
        actor: Option<&Actor>,
        details: Option<serde_json::Value>,
    ) {
        let (user_id, user_username) = match actor {
            Some(actor) => (Some(actor.id), actor.username.clone()),
            None => (None, SYSTEM_ACTOR.to_string()),
        };

        let entry = AuditLogEntry {
            id: Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            action: action.to_string(),
            entity_type: entity_type.to_string(),
            entity_id,
            status: status.as_str().to_string(),
            user_id,
            user_username: user_username.clone(),
            details,
        };

        match self.repository.insert(&entry).await {
            Ok(()) => {
                tracing::info!(
                    "Audit log: {} on {} by {}, status: {}",
                    action,
                    entity_type,
                    user_username,
                    status.as_str()
                );
            }
            Err(e) => {
                tracing::error!(
                    "Failed to log action '{}' for entity_type '{}': {}",
                    action,
                    entity_type,
                    e
                );
            }
        }
    }
}
