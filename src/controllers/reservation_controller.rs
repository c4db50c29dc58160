//! Motor de reservas
//!
//! El único flujo con estado del back-office: cálculo de coste, número
//! de reserva único, transiciones de estado con efecto sobre el coche
//! y lecturas desnormalizadas. La secuencia coche+reserva son
//! escrituras de fila única sin transacción que las envuelva.

use chrono::{DateTime, Utc};
use sqlx::types::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::decimal_to_f64;
use crate::dto::reservation_dto::{
    CreateReservationRequest, ReservationResponse, UpdateReservationRequest,
    UpdateReservationStatusRequest,
};
use crate::models::audit::AuditStatus;
use crate::models::auth::Actor;
use crate::models::car::CarStatus;
use crate::models::reservation::{
    car_side_effect, inclusive_days, new_reservation_number, CarSideEffect, Reservation,
    ReservationStatus,
};
use crate::repositories::car_repository::CarRepository;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::audit_logger::AuditLogger;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_entity_id;

pub struct ReservationController {
    reservations: ReservationRepository,
    cars: CarRepository,
    clients: ClientRepository,
    users: UserRepository,
    audit: AuditLogger,
}

fn to_money(value: f64) -> Result<Decimal, AppError> {
    Decimal::from_f64_retain(value)
        .ok_or_else(|| AppError::BadRequest("Invalid data type or format.".to_string()))
}

/// Coste estimado: tarifa diaria por días facturables, contando el día
/// de recogida y el de devolución
fn estimate_cost(
    daily_rate: Decimal,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Decimal, AppError> {
    if daily_rate <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Car daily rate is not set or invalid.".to_string(),
        ));
    }
    Ok(daily_rate * Decimal::from(inclusive_days(start, end)))
}

fn invalid_status_message() -> String {
    let valid = ReservationStatus::ALL
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!("Invalid status value. Must be one of: {}", valid)
}

impl ReservationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            reservations: ReservationRepository::new(pool.clone()),
            cars: CarRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            audit: AuditLogger::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateReservationRequest,
    ) -> Result<ReservationResponse, AppError> {
        if request.end_date < request.start_date {
            return Err(AppError::BadRequest(
                "End date cannot be before start date.".to_string(),
            ));
        }

        let car_id = parse_entity_id(&request.car_id, "car")?;
        let client_id = parse_entity_id(&request.client_id, "client")?;

        let car = self
            .cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found.".to_string()))?;
        if self.clients.find_by_id(client_id).await?.is_none() {
            return Err(AppError::NotFound("Client not found.".to_string()));
        }

        let mut estimated = estimate_cost(car.daily_rate, request.start_date, request.end_date)?;
        // Surcharge explícita del coste, solo si es positiva
        if let Some(provided) = request.estimated_total_cost {
            let provided = to_money(provided)?;
            if provided > Decimal::ZERO {
                estimated = provided;
            }
        }

        let status = match &request.status {
            Some(value) => ReservationStatus::parse(value)
                .ok_or_else(|| AppError::BadRequest(invalid_status_message()))?,
            None => ReservationStatus::PendingConfirmation,
        };

        // Se regenera hasta no chocar con el índice único; el espacio
        // de tokens hace la colisión rarísima
        let mut number = new_reservation_number();
        while self.reservations.number_exists(&number).await? {
            number = new_reservation_number();
        }

        let payment = request.payment_details.unwrap_or_default();
        let amount_paid = payment
            .amount_paid
            .map(to_money)
            .transpose()?
            .unwrap_or(Decimal::ZERO);

        let now = Utc::now();
        let reservation = Reservation {
            id: Uuid::new_v4(),
            reservation_number: number.clone(),
            car_id,
            client_id,
            start_date: request.start_date,
            end_date: request.end_date,
            actual_pickup_date: None,
            actual_return_date: None,
            status: status.as_str().to_string(),
            estimated_total_cost: estimated,
            final_total_cost: None,
            amount_paid,
            remaining_balance: estimated - amount_paid,
            transaction_date: payment.transaction_date,
            notes: request.notes.unwrap_or_default(),
            reservation_date: now,
            created_by: Some(actor.id),
            last_modified_at: now,
            last_modified_by: Some(actor.id),
        };

        match self.reservations.insert(&reservation).await {
            Ok(created) => {
                self.audit
                    .record(
                        "create_reservation",
                        "reservation",
                        Some(created.id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({
                            "reservationNumber": number,
                            "carId": car_id.to_string(),
                            "clientId": client_id.to_string(),
                        })),
                    )
                    .await;
                self.denormalize(created).await
            }
            Err(e) => {
                self.audit
                    .record(
                        "create_reservation",
                        "reservation",
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

    pub async fn get_by_id(&self, id: &str) -> Result<ReservationResponse, AppError> {
        let id = parse_entity_id(id, "reservation")?;
        let reservation = self
            .reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found.".to_string()))?;

        self.denormalize(reservation).await
    }

    pub async fn list(&self) -> Result<Vec<ReservationResponse>, AppError> {
        let reservations = self.reservations.find_all().await?;

        let mut responses = Vec::with_capacity(reservations.len());
        for reservation in reservations {
            responses.push(self.denormalize(reservation).await?);
        }
        Ok(responses)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateReservationRequest,
    ) -> Result<ReservationResponse, AppError> {
        let id = parse_entity_id(id, "reservation")?;

        let mut reservation = self
            .reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found.".to_string()))?;

        if request.is_empty() {
            return Err(AppError::BadRequest(
                "No valid fields provided for update.".to_string(),
            ));
        }

        let mut changed: Vec<&str> = Vec::new();

        let start_date = request.start_date.unwrap_or(reservation.start_date);
        let end_date = request.end_date.unwrap_or(reservation.end_date);
        let dates_changed = request.start_date.is_some() || request.end_date.is_some();
        if dates_changed && end_date < start_date {
            return Err(AppError::BadRequest(
                "End date cannot be before start date.".to_string(),
            ));
        }

        if let Some(car_id) = &request.car_id {
            reservation.car_id = parse_entity_id(car_id, "car")?;
            changed.push("carId");
        }
        if let Some(client_id) = &request.client_id {
            reservation.client_id = parse_entity_id(client_id, "client")?;
            changed.push("clientId");
        }
        if request.start_date.is_some() {
            reservation.start_date = start_date;
            changed.push("startDate");
        }
        if request.end_date.is_some() {
            reservation.end_date = end_date;
            changed.push("endDate");
        }

        let mut cost_changed = false;
        if let Some(value) = request.estimated_total_cost {
            // La surcharge explícita desactiva el recálculo automático
            reservation.estimated_total_cost = to_money(value)?;
            cost_changed = true;
            changed.push("estimatedTotalCost");
        } else if request.car_id.is_some() || dates_changed {
            // Recalcular con la tarifa del coche efectivo y el rango de
            // fechas efectivo
            if let Some(car) = self.cars.find_by_id(reservation.car_id).await? {
                reservation.estimated_total_cost =
                    estimate_cost(car.daily_rate, start_date, end_date)?;
                cost_changed = true;
                changed.push("estimatedTotalCost");
            }
        }

        if let Some(notes) = request.notes {
            reservation.notes = notes;
            changed.push("notes");
        }

        let mut payment_changed = false;
        if let Some(payment) = request.payment_details {
            if let Some(amount) = payment.amount_paid {
                reservation.amount_paid = to_money(amount)?;
                payment_changed = true;
            }
            if payment.transaction_date.is_some() {
                reservation.transaction_date = payment.transaction_date;
                payment_changed = true;
            }
            if payment_changed {
                changed.push("paymentDetails");
            }
        }

        // El saldo pendiente sigue al coste estimado efectivo y al pago
        if payment_changed || cost_changed {
            reservation.remaining_balance =
                reservation.estimated_total_cost - reservation.amount_paid;
        }

        if changed.is_empty() {
            return Err(AppError::BadRequest(
                "No valid fields provided for update.".to_string(),
            ));
        }

        reservation.last_modified_at = Utc::now();
        reservation.last_modified_by = Some(actor.id);
        changed.push("lastModifiedAt");
        changed.push("lastModifiedBy");

        match self.reservations.save(&reservation).await {
            Ok(saved) => {
                self.audit
                    .record(
                        "update_reservation",
                        "reservation",
                        Some(saved.id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({ "updated_fields": changed })),
                    )
                    .await;
                self.denormalize(saved).await
            }
            Err(e) => {
                self.audit
                    .record(
                        "update_reservation",
                        "reservation",
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

    /// Transición de estado. Cualquier estado válido puede fijarse
    /// desde cualquier otro; lo que varía es el sello de fechas, el
    /// coste final y el efecto sobre el coche.
    pub async fn transition_status(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateReservationStatusRequest,
    ) -> Result<ReservationResponse, AppError> {
        let id = parse_entity_id(id, "reservation")?;

        let new_status = ReservationStatus::parse(&request.status)
            .ok_or_else(|| AppError::BadRequest(invalid_status_message()))?;

        let mut reservation = self
            .reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found.".to_string()))?;

        let old_status = reservation.status.clone();
        let mut action_details = serde_json::json!({
            "old_status": old_status,
            "new_status": new_status.as_str(),
            "carId": reservation.car_id.to_string(),
        });

        let now = Utc::now();

        match new_status {
            ReservationStatus::Active => {
                reservation.actual_pickup_date = Some(now);
            }
            ReservationStatus::Completed => {
                reservation.actual_return_date = Some(now);

                // Coste final: el aportado o, en su defecto, el estimado
                let final_cost = match request.final_total_cost {
                    Some(value) => to_money(value)?,
                    None => reservation.estimated_total_cost,
                };
                reservation.final_total_cost = Some(final_cost);

                if let Some(payment) = &request.payment_details {
                    if let Some(amount) = payment.amount_paid {
                        reservation.amount_paid = to_money(amount)?;
                    }
                    if let Some(transaction_date) = payment.transaction_date {
                        reservation.transaction_date = Some(transaction_date);
                    }
                }
                // El saldo pasa a calcularse contra el coste final
                reservation.remaining_balance = final_cost - reservation.amount_paid;

                if let Some(notes) = &request.completion_notes {
                    reservation.notes = notes.clone();
                }

                action_details["finalTotalCost"] =
                    serde_json::json!(decimal_to_f64(final_cost));
            }
            _ => {}
        }

        // Para cancelaciones el efecto depende del estado actual del
        // coche; active/completed lo fijan incondicionalmente
        let car_status = if new_status.is_cancellation() {
            self.cars
                .find_by_id(reservation.car_id)
                .await?
                .and_then(|car| CarStatus::parse(&car.status))
        } else {
            None
        };

        match car_side_effect(new_status, car_status) {
            Some(CarSideEffect::MarkRented) => {
                self.cars
                    .set_status(reservation.car_id, CarStatus::Rented.as_str(), Some(actor.id))
                    .await?;
                self.audit
                    .record(
                        "update_car_status",
                        "car",
                        Some(reservation.car_id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({
                            "new_status": "rented",
                            "reason": format!(
                                "Reservation {} active",
                                reservation.reservation_number
                            ),
                        })),
                    )
                    .await;
            }
            Some(CarSideEffect::Release) => {
                self.cars
                    .set_status(
                        reservation.car_id,
                        CarStatus::Available.as_str(),
                        Some(actor.id),
                    )
                    .await?;
                let reason = if new_status == ReservationStatus::Completed {
                    format!("Reservation {} completed", reservation.reservation_number)
                } else {
                    format!(
                        "Reservation {} cancelled/no-show",
                        reservation.reservation_number
                    )
                };
                self.audit
                    .record(
                        "update_car_status",
                        "car",
                        Some(reservation.car_id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({ "new_status": "available", "reason": reason })),
                    )
                    .await;
            }
            None => {}
        }

        reservation.status = new_status.as_str().to_string();
        reservation.last_modified_at = now;
        reservation.last_modified_by = Some(actor.id);

        match self.reservations.save(&reservation).await {
            Ok(saved) => {
                self.audit
                    .record(
                        "update_reservation_status",
                        "reservation",
                        Some(saved.id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(action_details),
                    )
                    .await;
                self.denormalize(saved).await
            }
            Err(e) => {
                self.audit
                    .record(
                        "update_reservation_status",
                        "reservation",
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

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<(), AppError> {
        let id = parse_entity_id(id, "reservation")?;

        let reservation = self
            .reservations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reservation not found.".to_string()))?;

        // Número y coche quedan en la bitácora: tras el borrado la fila
        // ya no existe para rastrearlos
        let details = serde_json::json!({
            "reservationNumber": reservation.reservation_number,
            "carId": reservation.car_id.to_string(),
        });

        // Liberar el coche como en una cancelación antes de borrar
        if let Some(car) = self.cars.find_by_id(reservation.car_id).await? {
            let parked = matches!(
                CarStatus::parse(&car.status),
                Some(CarStatus::Available) | Some(CarStatus::Maintenance)
            );
            if !parked {
                self.cars
                    .set_status(
                        reservation.car_id,
                        CarStatus::Available.as_str(),
                        Some(actor.id),
                    )
                    .await?;
                self.audit
                    .record(
                        "update_car_status",
                        "car",
                        Some(reservation.car_id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({
                            "new_status": "available",
                            "reason": format!(
                                "Reservation {} deleted",
                                reservation.reservation_number
                            ),
                        })),
                    )
                    .await;
            }
        }

        match self.reservations.delete(id).await {
            Ok(()) => {
                self.audit
                    .record(
                        "delete_reservation",
                        "reservation",
                        Some(id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(details),
                    )
                    .await;
                Ok(())
            }
            Err(e) => {
                self.audit
                    .record(
                        "delete_reservation",
                        "reservation",
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

    /// Join de lectura: resúmenes de coche, cliente y usuarios. Los
    /// referenciados ausentes salen como null, nunca como error.
    async fn denormalize(
        &self,
        reservation: Reservation,
    ) -> Result<ReservationResponse, AppError> {
        let car = self.cars.summary(reservation.car_id).await?;
        let client = self.clients.summary(reservation.client_id).await?;
        let created_by = match reservation.created_by {
            Some(id) => self.users.summary(id).await?,
            None => None,
        };
        let last_modified_by = match reservation.last_modified_by {
            Some(id) => self.users.summary(id).await?,
            None => None,
        };

        Ok(ReservationResponse::from_parts(
            reservation,
            car,
            client,
            created_by,
            last_modified_by,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_estimate_cost_three_inclusive_days() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        let cost = estimate_cost(Decimal::from(100), start, end).unwrap();
        assert_eq!(cost, Decimal::from(300));
    }

    #[test]
    fn test_estimate_cost_same_day_bills_one_day() {
        let day = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        let cost = estimate_cost(Decimal::from(55), day, day).unwrap();
        assert_eq!(cost, Decimal::from(55));
    }

    #[test]
    fn test_estimate_cost_rejects_non_positive_rate() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert!(estimate_cost(Decimal::ZERO, start, end).is_err());
        assert!(estimate_cost(Decimal::from(-10), start, end).is_err());
    }

    #[test]
    fn test_invalid_status_message_lists_all_statuses() {
        let message = invalid_status_message();
        for status in ReservationStatus::ALL {
            assert!(message.contains(status.as_str()));
        }
    }

    #[test]
    fn test_to_money_roundtrip() {
        assert_eq!(to_money(120.5).unwrap(), Decimal::new(1205, 1));
        assert_eq!(to_money(0.0).unwrap(), Decimal::ZERO);
    }
}
