// src/db/financial_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};

use crate::common::db_utils::map_db_error;
use crate::common::error::AppError;
use crate::db::soft_delete::{select_active, SoftDeletable};
use crate::models::financial::Financial;

impl SoftDeletable for Financial {
    const TABLE: &'static str = "financials";
    const NOT_FOUND: &'static str = "Lançamento financeiro não encontrado";
    const ORDER_BY: &'static str = "date DESC";
}

#[derive(Clone)]
pub struct FinancialRepository {
    pool: PgPool,
}

impl FinancialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, entry: &Financial) -> Result<Financial, AppError> {
        sqlx::query_as::<_, Financial>(
            r#"
            INSERT INTO financials (
                id, kind, category, description, amount, date, due_date, status,
                payment_method, employee_id, sale_id, invoice_id, supplier, document,
                is_recurring, recurrence_type, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(entry.kind)
        .bind(entry.category)
        .bind(&entry.description)
        .bind(entry.amount)
        .bind(entry.date)
        .bind(entry.due_date)
        .bind(entry.status)
        .bind(entry.payment_method)
        .bind(entry.employee_id)
        .bind(entry.sale_id)
        .bind(entry.invoice_id)
        .bind(&entry.supplier)
        .bind(&entry.document)
        .bind(entry.is_recurring)
        .bind(entry.recurrence_type)
        .bind(&entry.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, &[]))
    }

    pub async fn update<'e, E>(&self, executor: E, entry: &Financial) -> Result<Financial, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Financial>(
            r#"
            UPDATE financials
            SET kind = $2, category = $3, description = $4, amount = $5, date = $6,
                due_date = $7, status = $8, payment_method = $9, employee_id = $10,
                sale_id = $11, invoice_id = $12, supplier = $13, document = $14,
                is_recurring = $15, recurrence_type = $16, notes = $17, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(entry.kind)
        .bind(entry.category)
        .bind(&entry.description)
        .bind(entry.amount)
        .bind(entry.date)
        .bind(entry.due_date)
        .bind(entry.status)
        .bind(entry.payment_method)
        .bind(entry.employee_id)
        .bind(entry.sale_id)
        .bind(entry.invoice_id)
        .bind(&entry.supplier)
        .bind(&entry.document)
        .bind(entry.is_recurring)
        .bind(entry.recurrence_type)
        .bind(&entry.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, &[]))
    }

    /// Lançamentos ativos com data em [start, end).
    pub async fn find_in_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Financial>, AppError> {
        let sql = select_active(Financial::TABLE, Some("date >= $1 AND date < $2"), Some("date ASC"));
        let entries = sqlx::query_as::<_, Financial>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await?;
        Ok(entries)
    }
}
