// src/db/product_repo.rs

use sqlx::{types::Json, Executor, PgPool, Postgres};

use crate::common::db_utils::{map_db_error, Constraint};
use crate::common::error::AppError;
use crate::db::soft_delete::SoftDeletable;
use crate::models::product::{normalize_code, CreateProductPayload, Product};

const UNIQUE_KEYS: &[Constraint] = &[Constraint::new(
    "idx_products_code_active",
    "code",
    "Código de produto já cadastrado",
)];

impl SoftDeletable for Product {
    const TABLE: &'static str = "products";
    const NOT_FOUND: &'static str = "Produto não encontrado";
    const ORDER_BY: &'static str = "name ASC";
    const CONSTRAINTS: &'static [Constraint] = UNIQUE_KEYS;
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: &CreateProductPayload) -> Result<Product, AppError> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                code, name, brand, category, quantity, unit_price, cost_price,
                min_stock, max_stock, supplier, description, image, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(normalize_code(&payload.code))
        .bind(payload.name.trim())
        .bind(payload.brand.trim())
        .bind(payload.category)
        .bind(payload.quantity)
        .bind(payload.unit_price)
        .bind(payload.cost_price)
        .bind(payload.min_stock)
        .bind(payload.max_stock)
        .bind(&payload.supplier)
        .bind(&payload.description)
        .bind(&payload.image)
        .bind(payload.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }

    pub async fn update<'e, E>(&self, executor: E, product: &Product) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET code = $2, name = $3, brand = $4, category = $5, unit_price = $6,
                cost_price = $7, min_stock = $8, max_stock = $9, supplier = $10,
                description = $11, image = $12, is_active = $13, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(product.id)
        .bind(&product.code)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(product.category)
        .bind(product.unit_price)
        .bind(product.cost_price)
        .bind(product.min_stock)
        .bind(product.max_stock)
        .bind(&product.supplier)
        .bind(&product.description)
        .bind(&product.image)
        .bind(product.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }

    /// Grava saldo e histórico após uma movimentação.
    pub async fn save_stock<'e, E>(&self, executor: E, product: &Product) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET quantity = $2, movements = $3, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(product.id)
        .bind(product.quantity)
        .bind(Json(&product.movements))
        .fetch_one(executor)
        .await?;
        Ok(product)
    }
}
