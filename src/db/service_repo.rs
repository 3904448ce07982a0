// src/db/service_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::soft_delete::{select_active, SoftDeletable};
use crate::models::service::{CreateServicePayload, Service};

impl SoftDeletable for Service {
    const TABLE: &'static str = "services";
    const NOT_FOUND: &'static str = "Serviço não encontrado";
    const ORDER_BY: &'static str = "item ASC";
}

#[derive(Clone)]
pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: &CreateServicePayload) -> Result<Service, AppError> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (item, description, image, price, category, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(payload.item.trim())
        .bind(&payload.description)
        .bind(&payload.image)
        .bind(payload.price)
        .bind(payload.category.trim())
        .bind(payload.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(service)
    }

    pub async fn update<'e, E>(&self, executor: E, service: &Service) -> Result<Service, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let service = sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
            SET item = $2, description = $3, image = $4, price = $5, category = $6,
                is_active = $7, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(service.id)
        .bind(&service.item)
        .bind(&service.description)
        .bind(&service.image)
        .bind(service.price)
        .bind(&service.category)
        .bind(service.is_active)
        .fetch_one(executor)
        .await?;
        Ok(service)
    }

    /// Serviços ativos do catálogo com os IDs informados (para precificar vendas).
    pub async fn find_active_by_ids<'e, E>(&self, executor: E, ids: &[Uuid]) -> Result<Vec<Service>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = select_active(Service::TABLE, Some("id = ANY($1)"), None);
        let services = sqlx::query_as::<_, Service>(&sql)
            .bind(ids)
            .fetch_all(executor)
            .await?;
        Ok(services)
    }
}
