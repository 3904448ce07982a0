// src/services/payment_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PaymentRepository, SoftDeleteRepository},
    models::payment::{CreatePaymentPayload, Payment, PaymentStatus, UpdatePaymentPayload},
    services::pricing::reprice_payment,
};

#[derive(Clone)]
pub struct PaymentService {
    repo: PaymentRepository,
    records: SoftDeleteRepository<Payment>,
    pool: PgPool,
}

impl PaymentService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: PaymentRepository::new(pool.clone()),
            records: SoftDeleteRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn records(&self) -> &SoftDeleteRepository<Payment> {
        &self.records
    }

    pub async fn create(&self, payload: CreatePaymentPayload) -> Result<Payment, AppError> {
        payload.method.ensure_direct("method")?;

        let now = Utc::now();
        let mut payment = Payment {
            id: Uuid::new_v4(),
            method: payload.method,
            status: payload.status,
            transaction_id: payload.transaction_id,
            quantity: payload.quantity,
            base_amount: payload.base_amount,
            discount: payload.discount,
            total_amount: payload.base_amount,
            service_id: payload.service_id,
            client_id: payload.client_id,
            notes: payload.notes,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        reprice_payment(&mut payment, payload.total_amount)?;

        let payment = self.repo.insert(&payment).await?;
        tracing::info!(payment_id = %payment.id, total = %payment.total_amount, "Pagamento criado");
        Ok(payment)
    }

    pub async fn update(&self, id: Uuid, payload: UpdatePaymentPayload) -> Result<Payment, AppError> {
        if let Some(method) = payload.method {
            method.ensure_direct("method")?;
        }

        let mut tx = self.pool.begin().await?;

        let mut payment = self.records.find_by_id_for_update(&mut *tx, id).await?;
        let submitted = payload.apply(&mut payment);
        reprice_payment(&mut payment, submitted)?;
        let payment = self.repo.update(&mut *tx, &payment).await?;

        tx.commit().await?;
        Ok(payment)
    }

    pub async fn find_by_status(&self, status: PaymentStatus) -> Result<Vec<Payment>, AppError> {
        self.records.find_active_by("status", status).await
    }

    pub async fn find_by_client(&self, client_id: Uuid) -> Result<Vec<Payment>, AppError> {
        self.records.find_active_by("client_id", client_id).await
    }

    pub async fn find_by_service(&self, service_id: Uuid) -> Result<Vec<Payment>, AppError> {
        self.records.find_active_by("service_id", service_id).await
    }
}
