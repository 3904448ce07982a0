// src/services/catalog_service.rs
//
// Catálogo de serviços da oficina.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ServiceRepository, SoftDeleteRepository},
    models::service::{CreateServicePayload, Service, UpdateServicePayload},
};

#[derive(Clone)]
pub struct CatalogService {
    repo: ServiceRepository,
    records: SoftDeleteRepository<Service>,
    pool: PgPool,
}

impl CatalogService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: ServiceRepository::new(pool.clone()),
            records: SoftDeleteRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn records(&self) -> &SoftDeleteRepository<Service> {
        &self.records
    }

    pub async fn create(&self, payload: CreateServicePayload) -> Result<Service, AppError> {
        let service = self.repo.create(&payload).await?;
        tracing::info!(service_id = %service.id, "Serviço criado");
        Ok(service)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateServicePayload) -> Result<Service, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut service = self.records.find_by_id_for_update(&mut *tx, id).await?;
        payload.apply(&mut service);
        let service = self.repo.update(&mut *tx, &service).await?;

        tx.commit().await?;
        Ok(service)
    }
}
