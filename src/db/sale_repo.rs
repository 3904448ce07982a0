// src/db/sale_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{types::Json, Executor, PgPool, Postgres};

use crate::common::db_utils::map_db_error;
use crate::common::error::AppError;
use crate::db::soft_delete::{select_active, SoftDeletable};
use crate::models::sale::Sale;

impl SoftDeletable for Sale {
    const TABLE: &'static str = "sales";
    const NOT_FOUND: &'static str = "Venda não encontrada";
    const ORDER_BY: &'static str = "date DESC";
}

#[derive(Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insere uma venda já precificada.
    pub async fn insert(&self, sale: &Sale) -> Result<Sale, AppError> {
        sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (
                id, date, status, total_amount, client_id, vehicle_id, employee_id,
                service_ids, ticket_id, payment_id, discount, tax, observations, items
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(sale.id)
        .bind(sale.date)
        .bind(sale.status)
        .bind(sale.total_amount)
        .bind(sale.client_id)
        .bind(sale.vehicle_id)
        .bind(sale.employee_id)
        .bind(&sale.service_ids)
        .bind(sale.ticket_id)
        .bind(sale.payment_id)
        .bind(sale.discount)
        .bind(sale.tax)
        .bind(&sale.observations)
        .bind(Json(&sale.items))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, &[]))
    }

    pub async fn update<'e, E>(&self, executor: E, sale: &Sale) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales
            SET date = $2, status = $3, total_amount = $4, client_id = $5, vehicle_id = $6,
                employee_id = $7, service_ids = $8, ticket_id = $9, payment_id = $10,
                discount = $11, tax = $12, observations = $13, items = $14, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(sale.id)
        .bind(sale.date)
        .bind(sale.status)
        .bind(sale.total_amount)
        .bind(sale.client_id)
        .bind(sale.vehicle_id)
        .bind(sale.employee_id)
        .bind(&sale.service_ids)
        .bind(sale.ticket_id)
        .bind(sale.payment_id)
        .bind(sale.discount)
        .bind(sale.tax)
        .bind(&sale.observations)
        .bind(Json(&sale.items))
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, &[]))
    }

    /// Vendas ativas com data em [start, end).
    pub async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sale>, AppError> {
        let sql = select_active(Sale::TABLE, Some("date >= $1 AND date < $2"), Some(Sale::ORDER_BY));
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(sales)
    }
}
