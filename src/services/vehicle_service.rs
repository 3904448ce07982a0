// src/services/vehicle_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{SoftDeletable, SoftDeleteRepository, VehicleRepository},
    models::{
        client::Client,
        vehicle::{normalize_plate, CreateVehiclePayload, UpdateVehiclePayload, Vehicle},
    },
};

#[derive(Clone)]
pub struct VehicleService {
    repo: VehicleRepository,
    records: SoftDeleteRepository<Vehicle>,
    clients: SoftDeleteRepository<Client>,
    pool: PgPool,
}

impl VehicleService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: VehicleRepository::new(pool.clone()),
            records: SoftDeleteRepository::new(pool.clone()),
            clients: SoftDeleteRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn records(&self) -> &SoftDeleteRepository<Vehicle> {
        &self.records
    }

    pub async fn create(&self, payload: CreateVehiclePayload) -> Result<Vehicle, AppError> {
        self.check_owner(payload.client_id).await?;

        let vehicle = self.repo.create(&payload).await?;
        tracing::info!(vehicle_id = %vehicle.id, plate = %vehicle.license_plate, "Veículo criado");
        Ok(vehicle)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateVehiclePayload) -> Result<Vehicle, AppError> {
        if let Some(client_id) = payload.client_id {
            self.check_owner(client_id).await?;
        }

        let mut tx = self.pool.begin().await?;

        let mut vehicle = self.records.find_by_id_for_update(&mut *tx, id).await?;
        payload.apply(&mut vehicle);
        let vehicle = self.repo.update(&mut *tx, &vehicle).await?;

        tx.commit().await?;
        Ok(vehicle)
    }

    pub async fn find_by_plate(&self, plate: &str) -> Result<Vehicle, AppError> {
        self.records
            .find_one_active_by("license_plate", normalize_plate(plate))
            .await?
            .ok_or_else(|| AppError::NotFound(Vehicle::NOT_FOUND.into()))
    }

    pub async fn find_by_client(&self, client_id: Uuid) -> Result<Vec<Vehicle>, AppError> {
        self.records.find_active_by("client_id", client_id).await
    }

    // O dono precisa ser um cliente ativo.
    async fn check_owner(&self, client_id: Uuid) -> Result<(), AppError> {
        if self.clients.find_by_id(client_id).await?.is_none() {
            return Err(AppError::invalid("clientId", Client::NOT_FOUND));
        }
        Ok(())
    }
}
