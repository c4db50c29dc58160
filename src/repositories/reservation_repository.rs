//! Repositorio de reservas
//!
//! El motor de reservas construye la fila completa (alta o fila
//! fusionada tras un update/transición) y aquí solo se persiste.

use chrono::{DateTime, Utc};
use sqlx::types::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::reservation::Reservation;
use crate::utils::errors::AppError;

pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, r: &Reservation) -> Result<Reservation, AppError> {
        let created = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (
                id, reservation_number, car_id, client_id, start_date, end_date,
                actual_pickup_date, actual_return_date, status, estimated_total_cost,
                final_total_cost, amount_paid, remaining_balance, transaction_date,
                notes, reservation_date, created_by, last_modified_at, last_modified_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(r.id)
        .bind(&r.reservation_number)
        .bind(r.car_id)
        .bind(r.client_id)
        .bind(r.start_date)
        .bind(r.end_date)
        .bind(r.actual_pickup_date)
        .bind(r.actual_return_date)
        .bind(&r.status)
        .bind(r.estimated_total_cost)
        .bind(r.final_total_cost)
        .bind(r.amount_paid)
        .bind(r.remaining_balance)
        .bind(r.transaction_date)
        .bind(&r.notes)
        .bind(r.reservation_date)
        .bind(r.created_by)
        .bind(r.last_modified_at)
        .bind(r.last_modified_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Persistir la fila fusionada de un update o una transición.
    /// `reservation_number`, `reservation_date` y `created_by` son
    /// inmutables y no se reescriben.
    pub async fn save(&self, r: &Reservation) -> Result<Reservation, AppError> {
        let saved = sqlx::query_as::<_, Reservation>(
            r#"
            UPDATE reservations
            SET car_id = $2, client_id = $3, start_date = $4, end_date = $5,
                actual_pickup_date = $6, actual_return_date = $7, status = $8,
                estimated_total_cost = $9, final_total_cost = $10, amount_paid = $11,
                remaining_balance = $12, transaction_date = $13, notes = $14,
                last_modified_at = $15, last_modified_by = $16
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(r.id)
        .bind(r.car_id)
        .bind(r.client_id)
        .bind(r.start_date)
        .bind(r.end_date)
        .bind(r.actual_pickup_date)
        .bind(r.actual_return_date)
        .bind(&r.status)
        .bind(r.estimated_total_cost)
        .bind(r.final_total_cost)
        .bind(r.amount_paid)
        .bind(r.remaining_balance)
        .bind(r.transaction_date)
        .bind(&r.notes)
        .bind(r.last_modified_at)
        .bind(r.last_modified_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Reservation>, AppError> {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(reservation)
    }

    /// Listado completo, reservas más recientes primero
    pub async fn find_all(&self) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations ORDER BY reservation_date DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    pub async fn number_exists(&self, number: &str) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM reservations WHERE reservation_number = $1)",
        )
        .bind(number)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Una reserva activa o confirmada bloquea el borrado del coche
    pub async fn car_has_blocking_reservation(&self, car_id: Uuid) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM reservations WHERE car_id = $1 AND status = ANY($2))",
        )
        .bind(car_id)
        .bind(vec!["active".to_string(), "confirmed".to_string()])
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Cualquier reserva, del estado que sea, bloquea el borrado del cliente
    pub async fn client_has_reservations(&self, client_id: Uuid) -> Result<bool, AppError> {
        let result: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM reservations WHERE client_id = $1)")
                .bind(client_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(result.0)
    }

    pub async fn count_by_status(&self, status: &str) -> Result<i64, AppError> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }

    /// Ingresos del mes: suma de costes finales de reservas completadas
    /// cuya devolución real cae en la ventana dada
    pub async fn revenue_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Decimal, AppError> {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(final_total_cost), 0)
            FROM reservations
            WHERE status = 'completed'
              AND final_total_cost IS NOT NULL
              AND actual_return_date >= $1
              AND actual_return_date < $2
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<Reservation>, AppError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations ORDER BY reservation_date DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }
}
