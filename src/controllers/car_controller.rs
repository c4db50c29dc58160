//! Controller de coches
//!
//! CRUD con unicidad de matrícula y VIN. Un coche referenciado por una
//! reserva activa o confirmada no se puede borrar.

use sqlx::types::Decimal;
use sqlx::PgPool;
use validator::Validate;

use crate::dto::car_dto::{CarResponse, CreateCarRequest, UpdateCarRequest};
use crate::models::audit::AuditStatus;
use crate::models::auth::Actor;
use crate::models::car::CarStatus;
use crate::repositories::car_repository::{CarChanges, CarRepository, NewCar};
use crate::repositories::reservation_repository::ReservationRepository;
use crate::services::audit_logger::AuditLogger;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_entity_id;

pub struct CarController {
    cars: CarRepository,
    reservations: ReservationRepository,
    audit: AuditLogger,
}

fn to_money(value: f64) -> Result<Decimal, AppError> {
    Decimal::from_f64_retain(value)
        .ok_or_else(|| AppError::BadRequest("Invalid data type for dailyRate.".to_string()))
}

impl CarController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            cars: CarRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            audit: AuditLogger::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        request: CreateCarRequest,
    ) -> Result<CarResponse, AppError> {
        request.validate()?;

        let status = CarStatus::parse(&request.status).ok_or_else(|| {
            AppError::BadRequest("Invalid status value. Must be one of: available, rented, maintenance".to_string())
        })?;

        let daily_rate = to_money(request.daily_rate)?;
        if daily_rate <= Decimal::ZERO {
            return Err(AppError::BadRequest(
                "dailyRate must be a positive number.".to_string(),
            ));
        }

        if self
            .cars
            .license_plate_exists(&request.license_plate, None)
            .await?
        {
            return Err(AppError::Conflict(
                "Car with this license plate already exists.".to_string(),
            ));
        }
        if self.cars.vin_exists(&request.vin, None).await? {
            return Err(AppError::Conflict(
                "Car with this VIN already exists.".to_string(),
            ));
        }

        let result = self
            .cars
            .create(NewCar {
                make: request.make,
                model: request.model,
                year: request.year,
                license_plate: request.license_plate,
                vin: request.vin,
                color: request.color,
                daily_rate,
                status: status.as_str().to_string(),
                image_url: request.image_url,
                description: request.description,
                added_by: Some(actor.id),
            })
            .await;

        match result {
            Ok(car) => {
                self.audit
                    .record(
                        "create_car",
                        "car",
                        Some(car.id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({
                            "licensePlate": car.license_plate,
                            "make": car.make,
                            "model": car.model,
                        })),
                    )
                    .await;
                Ok(CarResponse::from(car))
            }
            Err(e) => {
                self.audit
                    .record(
                        "create_car",
                        "car",
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

    pub async fn get_by_id(&self, id: &str) -> Result<CarResponse, AppError> {
        let id = parse_entity_id(id, "car")?;
        let car = self
            .cars
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found.".to_string()))?;

        Ok(CarResponse::from(car))
    }

    pub async fn list(&self) -> Result<Vec<CarResponse>, AppError> {
        let cars = self.cars.find_all().await?;
        Ok(cars.into_iter().map(CarResponse::from).collect())
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: &str,
        request: UpdateCarRequest,
    ) -> Result<CarResponse, AppError> {
        let id = parse_entity_id(id, "car")?;

        let mut changed: Vec<&str> = Vec::new();
        let mut changes = CarChanges::default();

        if let Some(make) = request.make {
            changes.make = Some(make);
            changed.push("make");
        }
        if let Some(model) = request.model {
            changes.model = Some(model);
            changed.push("model");
        }
        if let Some(year) = request.year {
            changes.year = Some(year);
            changed.push("year");
        }
        if let Some(license_plate) = request.license_plate {
            if self.cars.license_plate_exists(&license_plate, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Another car with this license plate already exists.".to_string(),
                ));
            }
            changes.license_plate = Some(license_plate);
            changed.push("licensePlate");
        }
        if let Some(vin) = request.vin {
            if self.cars.vin_exists(&vin, Some(id)).await? {
                return Err(AppError::Conflict(
                    "Another car with this VIN already exists.".to_string(),
                ));
            }
            changes.vin = Some(vin);
            changed.push("vin");
        }
        if let Some(color) = request.color {
            changes.color = Some(color);
            changed.push("color");
        }
        if let Some(daily_rate) = request.daily_rate {
            let daily_rate = to_money(daily_rate)?;
            if daily_rate <= Decimal::ZERO {
                return Err(AppError::BadRequest(
                    "dailyRate must be a positive number.".to_string(),
                ));
            }
            changes.daily_rate = Some(daily_rate);
            changed.push("dailyRate");
        }
        if let Some(status) = request.status {
            let status = CarStatus::parse(&status).ok_or_else(|| {
                AppError::BadRequest("Invalid status value. Must be one of: available, rented, maintenance".to_string())
            })?;
            changes.status = Some(status.as_str().to_string());
            changed.push("status");
        }
        if let Some(image_url) = request.image_url {
            changes.image_url = Some(image_url);
            changed.push("imageUrl");
        }
        if let Some(description) = request.description {
            changes.description = Some(description);
            changed.push("description");
        }

        if changed.is_empty() {
            return Err(AppError::BadRequest(
                "No valid fields provided for update.".to_string(),
            ));
        }

        match self.cars.update(id, changes, Some(actor.id)).await {
            Ok(car) => {
                self.audit
                    .record(
                        "update_car",
                        "car",
                        Some(id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({ "updated_fields": changed })),
                    )
                    .await;
                Ok(CarResponse::from(car))
            }
            Err(e) => {
                if !matches!(e, AppError::NotFound(_)) {
                    self.audit
                        .record(
                            "update_car",
                            "car",
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
        let id = parse_entity_id(id, "car")?;

        let car = self
            .cars
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found.".to_string()))?;

        // Una reserva activa o confirmada bloquea el borrado
        if self.reservations.car_has_blocking_reservation(id).await? {
            return Err(AppError::Conflict(
                "Cannot delete car: it is referenced by an active or confirmed reservation."
                    .to_string(),
            ));
        }

        match self.cars.delete(id).await {
            Ok(()) => {
                self.audit
                    .record(
                        "delete_car",
                        "car",
                        Some(id),
                        AuditStatus::Success,
                        Some(actor),
                        Some(serde_json::json!({ "licensePlate": car.license_plate })),
                    )
                    .await;
                Ok(())
            }
            Err(e) => {
                self.audit
                    .record(
                        "delete_car",
                        "car",
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
