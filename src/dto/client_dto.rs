use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::client::Client;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub cin: String,
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub driver_license_number: String,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub cin: Option<String>,
    pub email: Option<String>,
    pub driver_license_number: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub cin: String,
    pub email: Option<String>,
    pub driver_license_number: String,
    pub notes: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub registered_by: Option<String>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id.to_string(),
            first_name: client.first_name,
            last_name: client.last_name,
            phone: client.phone,
            cin: client.cin,
            email: client.email,
            driver_license_number: client.driver_license_number,
            notes: client.notes,
            registered_at: client.registered_at,
            registered_by: client.registered_by.map(|id| id.to_string()),
        }
    }
}
