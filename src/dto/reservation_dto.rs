use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dto::decimal_to_f64;
use crate::models::car::CarSummary;
use crate::models::client::ClientSummary;
use crate::models::reservation::Reservation;
use crate::models::user::UserSummary;

/// Detalles de pago aceptados en requests
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsInput {
    pub amount_paid: Option<f64>,
    pub transaction_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    pub car_id: String,
    pub client_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: Option<String>,
    pub estimated_total_cost: Option<f64>,
    pub notes: Option<String>,
    pub payment_details: Option<PaymentDetailsInput>,
}

/// Update parcial tipado. Los campos propiedad de la transición de
/// estado (status, fechas reales, coste final) no existen aquí y un
/// payload que los incluya se rechaza entero.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateReservationRequest {
    pub car_id: Option<String>,
    pub client_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub estimated_total_cost: Option<f64>,
    pub notes: Option<String>,
    pub payment_details: Option<PaymentDetailsInput>,
}

impl UpdateReservationRequest {
    pub fn is_empty(&self) -> bool {
        self.car_id.is_none()
            && self.client_id.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.estimated_total_cost.is_none()
            && self.notes.is_none()
            && self
                .payment_details
                .as_ref()
                .map(|p| p.amount_paid.is_none() && p.transaction_date.is_none())
                .unwrap_or(true)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReservationStatusRequest {
    pub status: String,
    pub final_total_cost: Option<f64>,
    pub completion_notes: Option<String>,
    pub payment_details: Option<PaymentDetailsInput>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetailsResponse {
    pub amount_paid: f64,
    pub remaining_balance: f64,
    pub transaction_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarDetailsResponse {
    pub id: String,
    pub make: String,
    pub model: String,
    pub license_plate: String,
    pub vin: String,
    pub status: String,
    pub image_url: Option<String>,
}

impl From<CarSummary> for CarDetailsResponse {
    fn from(car: CarSummary) -> Self {
        Self {
            id: car.id.to_string(),
            make: car.make,
            model: car.model,
            license_plate: car.license_plate,
            vin: car.vin,
            status: car.status,
            image_url: car.image_url,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDetailsResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: String,
}

impl From<ClientSummary> for ClientDetailsResponse {
    fn from(client: ClientSummary) -> Self {
        Self {
            id: client.id.to_string(),
            first_name: client.first_name,
            last_name: client.last_name,
            email: client.email,
            phone: client.phone,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailsResponse {
    pub id: String,
    pub username: String,
    pub full_name: String,
}

impl From<UserSummary> for UserDetailsResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            full_name: user.full_name,
        }
    }
}

/// Reserva con sus resúmenes desnormalizados de coche, cliente y
/// usuarios; los referenciados ausentes salen como null
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResponse {
    pub id: String,
    pub reservation_number: String,
    pub car_id: String,
    pub client_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub actual_pickup_date: Option<DateTime<Utc>>,
    pub actual_return_date: Option<DateTime<Utc>>,
    pub status: String,
    pub estimated_total_cost: f64,
    pub final_total_cost: Option<f64>,
    pub payment_details: PaymentDetailsResponse,
    pub notes: String,
    pub reservation_date: DateTime<Utc>,
    pub created_by: Option<String>,
    pub last_modified_at: DateTime<Utc>,
    pub last_modified_by: Option<String>,
    pub car_details: Option<CarDetailsResponse>,
    pub client_details: Option<ClientDetailsResponse>,
    pub created_by_user: Option<UserDetailsResponse>,
    pub last_modified_by_user: Option<UserDetailsResponse>,
}

impl ReservationResponse {
    pub fn from_parts(
        reservation: Reservation,
        car: Option<CarSummary>,
        client: Option<ClientSummary>,
        created_by_user: Option<UserSummary>,
        last_modified_by_user: Option<UserSummary>,
    ) -> Self {
        Self {
            id: reservation.id.to_string(),
            reservation_number: reservation.reservation_number,
            car_id: reservation.car_id.to_string(),
            client_id: reservation.client_id.to_string(),
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            actual_pickup_date: reservation.actual_pickup_date,
            actual_return_date: reservation.actual_return_date,
            status: reservation.status,
            estimated_total_cost: decimal_to_f64(reservation.estimated_total_cost),
            final_total_cost: reservation.final_total_cost.map(decimal_to_f64),
            payment_details: PaymentDetailsResponse {
                amount_paid: decimal_to_f64(reservation.amount_paid),
                remaining_balance: decimal_to_f64(reservation.remaining_balance),
                transaction_date: reservation.transaction_date,
            },
            notes: reservation.notes,
            reservation_date: reservation.reservation_date,
            created_by: reservation.created_by.map(|id| id.to_string()),
            last_modified_at: reservation.last_modified_at,
            last_modified_by: reservation.last_modified_by.map(|id| id.to_string()),
            car_details: car.map(CarDetailsResponse::from),
            client_details: client.map(ClientDetailsResponse::from),
            created_by_user: created_by_user.map(UserDetailsResponse::from),
            last_modified_by_user: last_modified_by_user.map(UserDetailsResponse::from),
        }
    }
}
