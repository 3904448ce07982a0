// src/services/client_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ClientRepository, SoftDeletable, SoftDeleteRepository},
    models::client::{Client, CreateClientPayload, UpdateClientPayload},
};

#[derive(Clone)]
pub struct ClientService {
    repo: ClientRepository,
    records: SoftDeleteRepository<Client>,
    pool: PgPool,
}

impl ClientService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: ClientRepository::new(pool.clone()),
            records: SoftDeleteRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn records(&self) -> &SoftDeleteRepository<Client> {
        &self.records
    }

    pub async fn create(&self, payload: CreateClientPayload) -> Result<Client, AppError> {
        let client = self.repo.create(&payload).await?;
        tracing::info!(client_id = %client.id, "Cliente criado");
        Ok(client)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateClientPayload) -> Result<Client, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut client = self.records.find_by_id_for_update(&mut *tx, id).await?;
        payload.apply(&mut client);
        let client = self.repo.update(&mut *tx, &client).await?;

        tx.commit().await?;
        Ok(client)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Client, AppError> {
        self.records
            .find_one_active_by("email", email.trim().to_lowercase())
            .await?
            .ok_or_else(|| AppError::NotFound(Client::NOT_FOUND.into()))
    }

    pub async fn find_by_cpf(&self, cpf: &str) -> Result<Client, AppError> {
        self.records
            .find_one_active_by("cpf", cpf.trim().to_string())
            .await?
            .ok_or_else(|| AppError::NotFound(Client::NOT_FOUND.into()))
    }
}
