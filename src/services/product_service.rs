// src/services/product_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, SoftDeleteRepository},
    models::product::{
        CreateProductPayload, Product, StockMovementPayload, UpdateProductPayload,
    },
};

#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
    records: SoftDeleteRepository<Product>,
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: ProductRepository::new(pool.clone()),
            records: SoftDeleteRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn records(&self) -> &SoftDeleteRepository<Product> {
        &self.records
    }

    pub async fn create(&self, payload: CreateProductPayload) -> Result<Product, AppError> {
        if payload.max_stock < payload.min_stock {
            return Err(AppError::invalid(
                "maxStock",
                "Estoque máximo deve ser maior que o mínimo",
            ));
        }

        let product = self.repo.create(&payload).await?;
        tracing::info!(product_id = %product.id, code = %product.code, "Produto criado");
        Ok(product)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateProductPayload) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut product = self.records.find_by_id_for_update(&mut *tx, id).await?;
        payload.apply(&mut product);
        product.check_stock_bounds()?;
        let product = self.repo.update(&mut *tx, &product).await?;

        tx.commit().await?;
        Ok(product)
    }

    /// Registra uma movimentação de estoque (entrada, saída ou ajuste).
    pub async fn add_movement(&self, id: Uuid, payload: StockMovementPayload) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut product = self.records.find_by_id_for_update(&mut *tx, id).await?;
        product.add_movement(
            payload.kind,
            payload.quantity,
            payload.reason,
            payload.employee_id,
            Utc::now(),
        )?;
        let product = self.repo.save_stock(&mut *tx, &product).await?;

        tx.commit().await?;

        if product.is_low_stock() {
            tracing::warn!(
                product_id = %product.id,
                quantity = product.quantity,
                min_stock = product.min_stock,
                "Produto com estoque baixo"
            );
        }
        Ok(product)
    }
}
