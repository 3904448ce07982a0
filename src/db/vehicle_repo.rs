// src/db/vehicle_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::common::db_utils::{map_db_error, Constraint};
use crate::common::error::AppError;
use crate::db::soft_delete::SoftDeletable;
use crate::models::vehicle::{normalize_plate, CreateVehiclePayload, Vehicle};

const UNIQUE_KEYS: &[Constraint] = &[Constraint::new(
    "idx_vehicles_plate_active",
    "licensePlate",
    "Placa já cadastrada",
)];

impl SoftDeletable for Vehicle {
    const TABLE: &'static str = "vehicles";
    const NOT_FOUND: &'static str = "Veículo não encontrado";
    const CONSTRAINTS: &'static [Constraint] = UNIQUE_KEYS;
}

#[derive(Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: &CreateVehiclePayload) -> Result<Vehicle, AppError> {
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (
                make, model, year, license_plate, color, engine_size,
                fuel_type, client_id, annotations, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(payload.make.trim())
        .bind(payload.model.trim())
        .bind(payload.year)
        .bind(normalize_plate(&payload.license_plate))
        .bind(&payload.color)
        .bind(&payload.engine_size)
        .bind(payload.fuel_type)
        .bind(payload.client_id)
        .bind(&payload.annotations)
        .bind(payload.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }

    pub async fn update<'e, E>(&self, executor: E, vehicle: &Vehicle) -> Result<Vehicle, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET make = $2, model = $3, year = $4, license_plate = $5, color = $6,
                engine_size = $7, fuel_type = $8, client_id = $9, annotations = $10,
                is_active = $11, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(vehicle.id)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.license_plate)
        .bind(&vehicle.color)
        .bind(&vehicle.engine_size)
        .bind(vehicle.fuel_type)
        .bind(vehicle.client_id)
        .bind(&vehicle.annotations)
        .bind(vehicle.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }
}
