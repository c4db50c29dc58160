//! Controller de clientes
//!
//! CRUD con unicidad de teléfono, CIN y email (si está presente). Un
//! cliente con cualquier reserva, del estado que sea, no se borra.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::client_dto::{ClientResponse, CreateClientRequest, UpdateClientRequest};
use crate::models::audit::AuditStatus;
use crate::models::auth::Actor;
use crate::repositories::client_repository::{ClientChanges, ClientRepository, NewClient};
use crate::repositories::reservation_repository::ReservationRepository;
use crate::services::audit_logger::AuditLogger;
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_entity_id, validate_email, validate_phone};

pub struct ClientController {
    clients: ClientRepository,
    reservations: ReservationRepository,
    audit: AuditLogger,
}

impl ClientController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            clients: ClientRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            audit: AuditLogger::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateClientRequest,
    ) -> Result<ClientResponse, AppError> {
        request.validate()?;

        validate_phone(&request.phone)
            .map_err(|_| AppError::BadRequest("Invalid phone number format.".to_string()))?;
        if let Some(email) = &request.email {
            validate_email(email)
                .map_err(|_| AppError::BadRequest("Invalid email format.".to_string()))?;
        }

        if self.clients.phone_exists(&request.phone, None).await? {
            return Err(AppError::Conflict(
                "Client with this phone number already exists.".to_string(),
            ));
        }
        if self.clients.cin_exists(&request.cin, None).await? {
            return Err(AppError::Conflict(
                "Client with this CIN already exists.".to_string(),
            ));
        }
        if let Some(email) = &request.email {
            if self.clients.email_exists(email, None).await? {
                return Err(AppError::Conflict(
                    "Client with this email already exists.".to_string(),
                ));
            }
        }

        let result = self
            .clients
            .create(NewClient {
                first_name: request.first_name,
                last_name: request.last_name,
                phone: request.phone,
                cin: request.cin,
                email: request.email,
                driver_license_number: request.driver_license_number,
                notes: request.notes,
                registered_by: Some(actor.id),
            })
            .await;

        match result {
            Ok(client) => {
                self.audit
                    .record(
                        "create_client",
                        "client",
                        Some(client.id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({
                            "firstName": client.first_name,
                            "lastName": client.last_name,
                        })),
                    )
                    .await;
                Ok(ClientResponse::from(client))
            }
            Err(e) => {
                self.audit
                    .record(
                        "create_client",
                        "client",
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

    pub async fn get_by_id(&self, id: &str) -> Result<ClientResponse, AppError> {
        let id = parse_entity_id(id, "client")?;
        let client = self
            .clients
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found.".to_string()))?;

        Ok(ClientResponse::from(client))
    }

    pub async fn list(&self) -> Result<Vec<ClientResponse>, AppError> {
        let clients = self.clients.find_all().await?;
        Ok(clients.into_iter().map(ClientResponse::from).collect())
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateClientRequest,
    ) -> Result<ClientResponse, AppError> {
        let id = parse_entity_id(id, "client")?;

        let mut changed: Vec<&str> = Vec::new();
        let mut changes = ClientChanges::default();

        if let Some(first_name) = request.first_name {
            changes.first_name = Some(first_name);
            changed.push("firstName");
        }
        if let Some(last_name) = request.last_name {
            changes.last_name = Some(last_name);
            changed.push("lastName");
        }
        if let Some(phone) = request.phone {
            validate_phone(&phone)
                .map_err(|_| AppError::BadRequest("Invalid phone number format.".to_string()))?;
            if self.clients.phone_exists(&phone, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Another client with this phone number already exists.".to_string(),
                ));
            }
            changes.phone = Some(phone);
            changed.push("phone");
        }
        if let Some(cin) = request.cin {
            if self.clients.cin_exists(&cin, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Another client with this CIN already exists.".to_string(),
                ));
            }
            changes.cin = Some(cin);
            changed.push("cin");
        }
        if let Some(email) = request.email {
            validate_email(&email)
                .map_err(|_| AppError::BadRequest("Invalid email format.".to_string()))?;
            if self.clients.email_exists(&email, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Another client with this email already exists.".to_string(),
                ));
            }
            changes.email = Some(email);
            changed.push("email");
        }
        if let Some(driver_license_number) = request.driver_license_number {
            changes.driver_license_number = Some(driver_license_number);
            changed.push("driverLicenseNumber");
        }
        if let Some(notes) = request.notes {
            changes.notes = Some(notes);
            changed.push("notes");
        }

        if changed.is_empty() {
            return Err(AppError::BadRequest(
                "No valid fields provided for update.".to_string(),
            ));
        }

        match self.clients.update(id, changes).await {
            Ok(client) => {
                self.audit
                    .record(
                        "update_client",
                        "client",
                        Some(id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({ "updated_fields": changed })),
                    )
                    .await;
                Ok(ClientResponse::from(client))
            }
            Err(e) => {
                if !matches!(e, AppError::NotFound(_)) {
                    self.audit
                        .record(
                            "update_client",
                            "client",
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
        let id = parse_entity_id(id, "client")?;

        let client = self
            .clients
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Client not found.".to_string()))?;

        // Cualquier reserva referenciando al cliente bloquea el borrado
        if self.reservations.client_has_reservations(id).await? {
            return Err(AppError::Conflict(
                "Cannot delete client: they are referenced by one or more reservations."
                    .to_string(),
            ));
        }

        match self.clients.delete(id).await {
            Ok(()) => {
                self.audit
                    .record(
                        "delete_client",
                        "client",
                        Some(id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({
                            "firstName": client.first_name,
                            "lastName": client.last_name,
                        })),
                    )
                    .await;
                Ok(())
            }
            Err(e) => {
                self.audit
                    .record(
                        "delete_client",
                        "client",
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
