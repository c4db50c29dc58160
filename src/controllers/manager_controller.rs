//! Controller de managers (solo admin)
//!
//! CRUD sobre usuarios con rol manager. El hash de contraseña nunca
//! sale en las respuestas y un admin no puede borrar su propia cuenta.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::manager_dto::{CreateManagerRequest, ManagerResponse, UpdateManagerRequest};
use crate::models::audit::AuditStatus;
use crate::models::auth::Actor;
use crate::repositories::user_repository::{NewUser, UserChanges, UserRepository};
use crate::services::audit_logger::AuditLogger;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_entity_id;

pub struct ManagerController {
    users: UserRepository,
    audit: AuditLogger,
}

fn hash_password(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AppError::Hash(e.to_string()))
}

impl ManagerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            audit: AuditLogger::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateManagerRequest,
    ) -> Result<ManagerResponse, AppError> {
        request.validate()?;

        if self.users.username_exists(&request.username, None).await? {
            return Err(AppError::Conflict(format!(
                "Username '{}' already exists.",
                request.username
            )));
        }

        let password_hash = hash_password(&request.password)?;

        let result = self
            .users
            .create(NewUser {
                username: request.username.clone(),
                password_hash,
                role: "manager".to_string(),
                full_name: request.full_name.clone(),
                is_active: request.is_active.unwrap_or(true),
            })
            .await;

        match result {
            Ok(manager) => {
                self.audit
                    .record(
                        "create_manager",
                        "manager",
                        Some(manager.id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({
                            "username": request.username,
                            "fullName": request.full_name,
                        })),
                    )
                    .await;
                Ok(ManagerResponse::from(manager))
            }
            Err(e) => {
                self.audit
                    .record(
                        "create_manager",
                        "manager",
                        None,
                        AuditStatus::Failure,
                        Some(actor),
                        Some(serde_json::json!({ "error": e.to_string() })),
                    )
                    .await;
                Err(e)
            }
        }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<ManagerResponse, AppError> {
        let id = parse_entity_id(id, "manager")?;
        let manager = self
            .users
            .find_manager(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Manager not found.".to_string()))?;

        Ok(ManagerResponse::from(manager))
    }

    pub async fn list(&self) -> Result<Vec<ManagerResponse>, AppError> {
        let managers = self.users.find_managers().await?;
        Ok(managers.into_iter().map(ManagerResponse::from).collect())
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateManagerRequest,
    ) -> Result<ManagerResponse, AppError> {
        let id = parse_entity_id(id, "manager")?;

        let mut changed: Vec<&str> = Vec::new();
        let mut changes = UserChanges::default();

        if let Some(username) = request.username.filter(|u| !u.is_empty()) {
            if self.users.username_exists(&username, Some(id)).await? {
                return Err(AppError::Conflict(format!(
                    "Username '{}' already taken.",
                    username
                )));
            }
            changes.username = Some(username);
            changed.push("username");
        }
        if let Some(password) = request.password.filter(|p| !p.is_empty()) {
            changes.password_hash = Some(hash_password(&password)?);
            changed.push("password");
        }
        if let Some(full_name) = request.full_name.filter(|n| !n.is_empty()) {
            changes.full_name = Some(full_name);
            changed.push("fullName");
        }
        if let Some(is_active) = request.is_active {
            changes.is_active = Some(is_active);
            changed.push("isActive");
        }

        if changed.is_empty() {
            return Err(AppError::BadRequest(
                "No valid or changed fields provided for update.".to_string(),
            ));
        }
        changed.push("updatedAt");

        match self.users.update_manager(id, changes).await {
            Ok(manager) => {
                self.audit
                    .record(
                        "update_manager",
                        "manager",
                        Some(id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({ "updated_fields": changed })),
                    )
                    .await;
                Ok(ManagerResponse::from(manager))
            }
            Err(e) => {
                if !matches!(e, AppError::NotFound(_)) {
                    self.audit
                        .record(
                            "update_manager",
                            "manager",
                            Some(id),
                            AuditStatus::Failure,
                            Some(actor),
                            Some(serde_json::json!({ "error": e.to_string() })),
                        )
                        .await;
                }
                Err(e)
            }
        }
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), AppError> {
        // La cuenta propia no se borra por esta ruta
        if actor.id.to_string() == id {
            self.audit
                .record(
                    "delete_manager",
                    "manager",
                    Some(actor.id),
                    AuditStatus::Failure,
                    Some(actor),
                    Some(serde_json::json!({
                        "error": "Admin attempted to delete own account"
                    })),
                )
                .await;
            return Err(AppError::Forbidden(
                "Operation not allowed. Cannot delete own account via this route.".to_string(),
            ));
        }

        let id = parse_entity_id(id, "manager")?;

        let manager = self
            .users
            .find_manager(id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Manager not found or user is not a manager.".to_string())
            })?;

        match self.users.delete_manager(id).await {
            Ok(true) => {
                self.audit
                    .record(
                        "delete_manager",
                        "manager",
                        Some(id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({ "deleted_username": manager.username })),
                    )
                    .await;
                Ok(())
            }
            Ok(false) => Err(AppError::NotFound(
                "Manager not found or user is not a manager.".to_string(),
            )),
            Err(e) => {
                self.audit
                    .record(
                        "delete_manager",
                        "manager",
                        Some(id),
                        AuditStatus::Failure,
                        Some(actor),
                        Some(serde_json::json!({ "error": e.to_string() })),
                    )
                    .await;
                Err(e)
            }
        }
    }
}
