//! Repositorio de coches

use chrono::Utc;
use sqlx::types::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::car::{Car, CarSummary};
use crate::utils::errors::AppError;

/// Datos de alta de un coche, ya validados por el controller
#[derive(Debug)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub vin: String,
    pub color: Option<String>,
    pub daily_rate: Decimal,
    pub status: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    pub added_by: Option<Uuid>,
}

/// Cambios parciales sobre un coche
#[derive(Debug, Default)]
pub struct CarChanges {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub license_plate: Option<String>,
    pub vin: Option<String>,
    pub color: Option<String>,
    pub daily_rate: Option<Decimal>,
    pub status: Option<String>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, car: NewCar) -> Result<Car, AppError> {
        let created = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (id, make, model, year, license_plate, vin, color, daily_rate, status, image_url, description, added_at, added_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(car.make)
        .bind(car.model)
        .bind(car.year)
        .bind(car.license_plate)
        .bind(car.vin)
        .bind(car.color)
        .bind(car.daily_rate)
        .bind(car.status)
        .bind(car.image_url)
        .bind(car.description)
        .bind(Utc::now())
        .bind(car.added_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    pub async fn find_all(&self) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars ORDER BY added_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(cars)
    }

    /// Proyección mínima para respuestas desnormalizadas de reservas
    pub async fn summary(&self, id: Uuid) -> Result<Option<CarSummary>, AppError> {
        let summary = sqlx::query_as::<_, CarSummary>(
            "SELECT id, make, model, license_plate, vin, status, image_url FROM cars WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    pub async fn license_plate_exists(
        &self,
        license_plate: &str,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM cars WHERE license_plate = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(license_plate)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn vin_exists(&self, vin: &str, exclude: Option<Uuid>) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM cars WHERE vin = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(vin)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn update(&self, id: Uuid, changes: CarChanges, updated_by: Option<Uuid>) -> Result<Car, AppError> {
        // Leer el coche actual y fusionar los cambios campo a campo
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found.".to_string()))?;

        let updated = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET make = $2, model = $3, year = $4, license_plate = $5, vin = $6, color = $7,
                daily_rate = $8, status = $9, image_url = $10, description = $11,
                updated_at = $12, updated_by = $13
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.make.unwrap_or(current.make))
        .bind(changes.model.unwrap_or(current.model))
        .bind(changes.year.unwrap_or(current.year))
        .bind(changes.license_plate.unwrap_or(current.license_plate))
        .bind(changes.vin.unwrap_or(current.vin))
        .bind(changes.color.or(current.color))
        .bind(changes.daily_rate.unwrap_or(current.daily_rate))
        .bind(changes.status.unwrap_or(current.status))
        .bind(changes.image_url.or(current.image_url))
        .bind(changes.description.or(current.description))
        .bind(Utc::now())
        .bind(updated_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Cambio de estado disparado por el motor de reservas
    pub async fn set_status(
        &self,
        id: Uuid,
        status: &str,
        updated_by: Option<Uuid>,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE cars SET status = $2, updated_at = $3, updated_by = $4 WHERE id = $1")
            .bind(id)
            .bind(status)
            .bind(Utc::now())
            .bind(updated_by)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    pub async fn count_by_status(&self, status: &str) -> Result<i64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cars WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }
}
