//! Estadísticas agregadas para los paneles de admin y manager
//!
//! Solo lecturas: recuentos, ingresos del mes en curso y listados
//! recientes. Cada petición consulta la base de datos, sin caché.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use sqlx::PgPool;

use crate::dto::dashboard_dto::{
    AdminStatsResponse, ManagerDashboardStatsResponse, RecentClientResponse,
    RecentReservationResponse,
};
use crate::dto::decimal_to_f64;
use crate::models::audit::AuditStatus;
use crate::models::auth::Actor;
use crate::models::car::CarStatus;
use crate::models::reservation::ReservationStatus;
use crate::repositories::car_repository::CarRepository;
use crate::repositories::client_repository::ClientRepository;
use crate::repositories::reservation_repository::ReservationRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::audit_logger::AuditLogger;
use crate::utils::errors::AppError;

const DEFAULT_RECENT_LIMIT: i64 = 3;

pub struct DashboardController {
    cars: CarRepository,
    clients: ClientRepository,
    reservations: ReservationRepository,
    users: UserRepository,
    audit: AuditLogger,
}

/// Ventana [inicio de mes, inicio del mes siguiente) para los ingresos
fn month_window(now: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc
        .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()?;
    let (next_year, next_month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()?;
    Some((start, end))
}

impl DashboardController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            cars: CarRepository::new(pool.clone()),
            clients: ClientRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            audit: AuditLogger::new(pool),
        }
    }

    pub async fn admin_stats(&self, actor: &Actor) -> Result<AdminStatsResponse, AppError> {
        let total_managers = self.users.count_managers().await?;
        let total_system_users = self.users.count_all().await?;

        self.audit
            .record(
                "get_admin_stats",
                "system_stats",
                None,
                AuditStatus::Success,
                Some(actor),
                None,
            )
            .await;

        Ok(AdminStatsResponse {
            total_managers,
            total_system_users,
        })
    }

    pub async fn manager_stats(&self) -> Result<ManagerDashboardStatsResponse, AppError> {
        let total_cars = self.cars.count_all().await?;
        let available_cars = self
            .cars
            .count_by_status(CarStatus::Available.as_str())
            .await?;
        let rented_cars = self.cars.count_by_status(CarStatus::Rented.as_str()).await?;
        let maintenance_cars = self
            .cars
            .count_by_status(CarStatus::Maintenance.as_str())
            .await?;

        let total_clients = self.clients.count_all().await?;

        let active_reservations = self
            .reservations
            .count_by_status(ReservationStatus::Active.as_str())
            .await?;
        let pending_reservations = self
            .reservations
            .count_by_status(ReservationStatus::PendingConfirmation.as_str())
            .await?;

        let (from, to) = month_window(Utc::now())
            .ok_or_else(|| AppError::Internal("Could not compute month window".to_string()))?;
        let monthly_revenue = self.reservations.revenue_between(from, to).await?;

        Ok(ManagerDashboardStatsResponse {
            total_cars,
            available_cars,
            rented_cars,
            maintenance_cars,
            total_clients,
            active_reservations,
            pending_reservations,
            monthly_revenue: decimal_to_f64(monthly_revenue),
        })
    }

    pub async fn recent_clients(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<RecentClientResponse>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT).max(1);
        let clients = self.clients.recent(limit).await?;

        Ok(clients
            .into_iter()
            .map(|client| RecentClientResponse {
                id: client.id.to_string(),
                name: format!("{} {}", client.first_name, client.last_name)
                    .trim()
                    .to_string(),
                email: client.email,
                registered_at: client.registered_at,
            })
            .collect())
    }

    pub async fn recent_reservations(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<RecentReservationResponse>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT).max(1);
        let reservations = self.reservations.recent(limit).await?;

        let mut responses = Vec::with_capacity(reservations.len());
        for reservation in reservations {
            let client_name = match self.clients.summary(reservation.client_id).await? {
                Some(client) => format!("{} {}", client.first_name, client.last_name)
                    .trim()
                    .to_string(),
                None => "N/A".to_string(),
            };
            let car_model = match self.cars.summary(reservation.car_id).await? {
                Some(car) => format!("{} {}", car.make, car.model).trim().to_string(),
                None => "N/A".to_string(),
            };

            responses.push(RecentReservationResponse {
                id: reservation.id.to_string(),
                client_name,
                car_model,
                start_date: reservation.start_date,
                status: reservation.status,
            });
        }
        Ok(responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_window_mid_year() {
        let now = Utc.with_ymd_and_hms(2024, 5, 17, 12, 30, 0).unwrap();
        let (from, to) = month_window(now).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_month_window_december_rolls_over() {
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        let (from, to) = month_window(now).unwrap();
        assert_eq!(from, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(to, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
    }
}
