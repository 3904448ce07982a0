// src/db/invoice_repo.rs

use sqlx::{types::Json, Executor, PgPool, Postgres};

use crate::common::db_utils::{map_db_error, Constraint};
use crate::common::error::AppError;
use crate::db::soft_delete::SoftDeletable;
use crate::models::invoice::Invoice;
use crate::services::pricing::format_invoice_number;

const UNIQUE_KEYS: &[Constraint] = &[Constraint::new(
    "invoices_number_key",
    "number",
    "Número de nota já utilizado",
)];

impl SoftDeletable for Invoice {
    const TABLE: &'static str = "invoices";
    const NOT_FOUND: &'static str = "Nota fiscal não encontrada";
    // Ordem numérica: "1000000" vem depois de "999999".
    const ORDER_BY: &'static str = "number::bigint DESC";
    const CONSTRAINTS: &'static [Constraint] = UNIQUE_KEYS;
}

#[derive(Clone)]
pub struct InvoiceRepository {
    pool: PgPool,
}

impl InvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Numera e insere a nota na mesma transação.
    pub async fn create(&self, mut invoice: Invoice) -> Result<Invoice, AppError> {
        let mut tx = self.pool.begin().await?;

        invoice.number = self.next_number(&mut *tx).await?;
        let saved = self.insert(&mut *tx, &invoice).await?;

        tx.commit().await?;
        Ok(saved)
    }

    /// Próximo número de nota. A sequence garante unicidade entre requisições
    /// concorrentes (números de transações abortadas não são reaproveitados).
    async fn next_number<'e, E>(&self, executor: E) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let seq: i64 = sqlx::query_scalar("SELECT nextval('invoice_number_seq')")
            .fetch_one(executor)
            .await?;
        Ok(format_invoice_number(seq))
    }

    async fn insert<'e, E>(&self, executor: E, invoice: &Invoice) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (
                id, number, series, invoice_type, client_id, sale_id, employee_id, items,
                subtotal, discount, tax, total, payment_method, payment_status,
                issue_date, due_date, notes, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING *
            "#,
        )
        .bind(invoice.id)
        .bind(&invoice.number)
        .bind(&invoice.series)
        .bind(invoice.invoice_type)
        .bind(invoice.client_id)
        .bind(invoice.sale_id)
        .bind(invoice.employee_id)
        .bind(Json(&invoice.items))
        .bind(invoice.subtotal)
        .bind(invoice.discount)
        .bind(invoice.tax)
        .bind(invoice.total)
        .bind(invoice.payment_method)
        .bind(invoice.payment_status)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(&invoice.notes)
        .bind(invoice.status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }

    pub async fn update<'e, E>(&self, executor: E, invoice: &Invoice) -> Result<Invoice, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Invoice>(
            r#"
            UPDATE invoices
            SET invoice_type = $2, client_id = $3, sale_id = $4, employee_id = $5, items = $6,
                subtotal = $7, discount = $8, tax = $9, total = $10, payment_method = $11,
                payment_status = $12, issue_date = $13, due_date = $14, notes = $15,
                status = $16, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(invoice.id)
        .bind(invoice.invoice_type)
        .bind(invoice.client_id)
        .bind(invoice.sale_id)
        .bind(invoice.employee_id)
        .bind(Json(&invoice.items))
        .bind(invoice.subtotal)
        .bind(invoice.discount)
        .bind(invoice.tax)
        .bind(invoice.total)
        .bind(invoice.payment_method)
        .bind(invoice.payment_status)
        .bind(invoice.issue_date)
        .bind(invoice.due_date)
        .bind(&invoice.notes)
        .bind(invoice.status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::soft_delete::select_active;

    #[test]
    fn listing_orders_numbers_numerically() {
        let sql = select_active(Invoice::TABLE, None, Some(Invoice::ORDER_BY));
        assert!(sql.ends_with("ORDER BY number::bigint DESC"));
    }
}
