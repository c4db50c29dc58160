//! Modelo de reserva y su máquina de estados
//!
//! El estado de una reserva solo se valida por pertenencia al conjunto
//! permitido: cualquier estado válido puede fijarse desde cualquier
//! otro, igual que en las versiones anteriores del sistema. Lo que sí
//! es fijo es el efecto colateral sobre el coche de cada transición.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::car::CarStatus;

/// Estados válidos de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    PendingConfirmation,
    Confirmed,
    Active,
    Completed,
    CancelledByClient,
    CancelledByAgency,
    NoShow,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 7] = [
        ReservationStatus::PendingConfirmation,
        ReservationStatus::Confirmed,
        ReservationStatus::Active,
        ReservationStatus::Completed,
        ReservationStatus::CancelledByClient,
        ReservationStatus::CancelledByAgency,
        ReservationStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::PendingConfirmation => "pending_confirmation",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Active => "active",
            ReservationStatus::Completed => "completed",
            ReservationStatus::CancelledByClient => "cancelled_by_client",
            ReservationStatus::CancelledByAgency => "cancelled_by_agency",
            ReservationStatus::NoShow => "no_show",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.as_str() == value)
    }

    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            ReservationStatus::CancelledByClient
                | ReservationStatus::CancelledByAgency
                | ReservationStatus::NoShow
        )
    }
}

/// Efecto colateral sobre el coche que acompaña a una transición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarSideEffect {
    MarkRented,
    Release,
}

/// Decide el efecto sobre el coche para una transición de estado.
///
/// - `active`: el coche pasa a `rented`.
/// - `completed`: el coche vuelve a `available`.
/// - cancelaciones y no-show: se libera el coche solo si no está ya
///   `available` ni en `maintenance`.
/// - `confirmed` / `pending_confirmation`: sin efecto.
pub fn car_side_effect(
    new_status: ReservationStatus,
    car_status: Option<CarStatus>,
) -> Option<CarSideEffect> {
    match new_status {
        ReservationStatus::Active => Some(CarSideEffect::MarkRented),
        ReservationStatus::Completed => Some(CarSideEffect::Release),
        s if s.is_cancellation() => match car_status {
            Some(CarStatus::Available) | Some(CarStatus::Maintenance) | None => None,
            Some(_) => Some(CarSideEffect::Release),
        },
        _ => None,
    }
}

/// Número de días facturables, contando el día de recogida y el de
/// devolución
pub fn inclusive_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    (end - start).num_days() + 1
}

const RESERVATION_NUMBER_LEN: usize = 10;
const RESERVATION_NUMBER_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generar un número de reserva: token corto orientado a humanos,
/// distinto del id interno. La unicidad real la garantiza el índice
/// único más el bucle de reintento del motor de reservas.
pub fn new_reservation_number() -> String {
    let mut rng = rand::thread_rng();
    (0..RESERVATION_NUMBER_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..RESERVATION_NUMBER_CHARSET.len());
            RESERVATION_NUMBER_CHARSET[idx] as char
        })
        .collect()
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub reservation_number: String,
    pub car_id: Uuid,
    pub client_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub actual_pickup_date: Option<DateTime<Utc>>,
    pub actual_return_date: Option<DateTime<Utc>>,
    pub status: String,
    pub estimated_total_cost: sqlx::types::Decimal,
    pub final_total_cost: Option<sqlx::types::Decimal>,
    pub amount_paid: sqlx::types::Decimal,
    pub remaining_balance: sqlx::types::Decimal,
    pub transaction_date: Option<DateTime<Utc>>,
    pub notes: String,
    pub reservation_date: DateTime<Utc>,
    pub created_by: Option<Uuid>,
    pub last_modified_at: DateTime<Utc>,
    pub last_modified_by: Option<Uuid>,
}

impl Reservation {
    /// Coste efectivo contra el que se calcula el saldo pendiente
    pub fn effective_total(&self) -> sqlx::types::Decimal {
        self.final_total_cost.unwrap_or(self.estimated_total_cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_status_parse_membership() {
        for status in ReservationStatus::ALL {
            assert_eq!(ReservationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReservationStatus::parse("pending"), None);
        assert_eq!(ReservationStatus::parse(""), None);
    }

    #[test]
    fn test_inclusive_days_counts_both_ends() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        assert_eq!(inclusive_days(start, end), 3);
        // Mismo día: un día facturable
        assert_eq!(inclusive_days(start, start), 1);
    }

    #[test]
    fn test_side_effect_active_marks_rented() {
        assert_eq!(
            car_side_effect(ReservationStatus::Active, Some(CarStatus::Available)),
            Some(CarSideEffect::MarkRented)
        );
    }

    #[test]
    fn test_side_effect_completed_releases() {
        assert_eq!(
            car_side_effect(ReservationStatus::Completed, Some(CarStatus::Rented)),
            Some(CarSideEffect::Release)
        );
    }

    #[test]
    fn test_side_effect_cancellation_only_releases_busy_cars() {
        for status in [
            ReservationStatus::CancelledByClient,
            ReservationStatus::CancelledByAgency,
            ReservationStatus::NoShow,
        ] {
            assert_eq!(
                car_side_effect(status, Some(CarStatus::Rented)),
                Some(CarSideEffect::Release)
            );
            assert_eq!(car_side_effect(status, Some(CarStatus::Available)), None);
            assert_eq!(car_side_effect(status, Some(CarStatus::Maintenance)), None);
            assert_eq!(car_side_effect(status, None), None);
        }
    }

    #[test]
    fn test_side_effect_confirmation_is_neutral() {
        assert_eq!(
            car_side_effect(ReservationStatus::Confirmed, Some(CarStatus::Rented)),
            None
        );
        assert_eq!(
            car_side_effect(
                ReservationStatus::PendingConfirmation,
                Some(CarStatus::Available)
            ),
            None
        );
    }

    #[test]
    fn test_effective_total_prefers_final_cost() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut reservation = Reservation {
            id: Uuid::new_v4(),
            reservation_number: "ABC123XYZ0".to_string(),
            car_id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            start_date: now,
            end_date: now,
            actual_pickup_date: None,
            actual_return_date: None,
            status: "pending_confirmation".to_string(),
            estimated_total_cost: sqlx::types::Decimal::from(300),
            final_total_cost: None,
            amount_paid: sqlx::types::Decimal::ZERO,
            remaining_balance: sqlx::types::Decimal::from(300),
            transaction_date: None,
            notes: String::new(),
            reservation_date: now,
            created_by: None,
            last_modified_at: now,
            last_modified_by: None,
        };

        assert_eq!(reservation.effective_total(), sqlx::types::Decimal::from(300));
        reservation.final_total_cost = Some(sqlx::types::Decimal::from(280));
        assert_eq!(reservation.effective_total(), sqlx::types::Decimal::from(280));
    }

    #[test]
    fn test_reservation_number_shape() {
        for _ in 0..100 {
            let number = new_reservation_number();
            assert_eq!(number.len(), 10);
            assert!(number
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_reservation_numbers_unique_in_bulk() {
        // Doble de pruebas: 10.000 generaciones contra un set en memoria
        // con el mismo bucle de reintento que usa el motor de reservas.
        let mut taken: HashSet<String> = HashSet::new();
        for _ in 0..10_000 {
            let mut number = new_reservation_number();
            while taken.contains(&number) {
                number = new_reservation_number();
            }
            taken.insert(number);
        }
        assert_eq!(taken.len(), 10_000);
    }
}
