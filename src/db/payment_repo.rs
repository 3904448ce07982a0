// src/db/payment_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::common::db_utils::{map_db_error, Constraint};
use crate::common::error::AppError;
use crate::db::soft_delete::SoftDeletable;
use crate::models::payment::Payment;

const UNIQUE_KEYS: &[Constraint] = &[Constraint::new(
    "idx_payments_transaction_active",
    "transactionId",
    "ID de transação já utilizado",
)];

impl SoftDeletable for Payment {
    const TABLE: &'static str = "payments";
    const NOT_FOUND: &'static str = "Pagamento não encontrado";
    const CONSTRAINTS: &'static [Constraint] = UNIQUE_KEYS;
}

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insere um pagamento já precificado.
    pub async fn insert(&self, payment: &Payment) -> Result<Payment, AppError> {
        sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                id, method, status, transaction_id, quantity, base_amount,
                discount, total_amount, service_id, client_id, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(payment.id)
        .bind(payment.method)
        .bind(payment.status)
        .bind(&payment.transaction_id)
        .bind(payment.quantity)
        .bind(payment.base_amount)
        .bind(payment.discount)
        .bind(payment.total_amount)
        .bind(payment.service_id)
        .bind(payment.client_id)
        .bind(&payment.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }

    pub async fn update<'e, E>(&self, executor: E, payment: &Payment) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET method = $2, status = $3, transaction_id = $4, quantity = $5,
                base_amount = $6, discount = $7, total_amount = $8, service_id = $9,
                client_id = $10, notes = $11, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(payment.id)
        .bind(payment.method)
        .bind(payment.status)
        .bind(&payment.transaction_id)
        .bind(payment.quantity)
        .bind(payment.base_amount)
        .bind(payment.discount)
        .bind(payment.total_amount)
        .bind(payment.service_id)
        .bind(payment.client_id)
        .bind(&payment.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }
}
