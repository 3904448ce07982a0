// src/services/invoice_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{InvoiceRepository, SoftDeletable, SoftDeleteRepository},
    models::invoice::{CreateInvoicePayload, Invoice, InvoiceItem, InvoiceStatus, UpdateInvoicePayload},
    services::pricing::{format_invoice_number, reprice_invoice},
};

#[derive(Clone)]
pub struct InvoiceService {
    repo: InvoiceRepository,
    records: SoftDeleteRepository<Invoice>,
    pool: PgPool,
}

impl InvoiceService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: InvoiceRepository::new(pool.clone()),
            records: SoftDeleteRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn records(&self) -> &SoftDeleteRepository<Invoice> {
        &self.records
    }

    /// Emite a nota: precifica os itens e numera pela sequence do banco.
    pub async fn create(&self, payload: CreateInvoicePayload) -> Result<Invoice, AppError> {
        payload.payment_method.ensure_direct("paymentMethod")?;

        let now = Utc::now();
        let mut invoice = Invoice {
            id: Uuid::new_v4(),
            number: String::new(),
            series: payload.series.trim().to_string(),
            invoice_type: payload.invoice_type,
            client_id: payload.client_id,
            sale_id: payload.sale_id,
            employee_id: payload.employee_id,
            items: payload.items.into_iter().map(InvoiceItem::from).collect(),
            subtotal: Decimal::ZERO,
            discount: payload.discount,
            tax: payload.tax,
            total: Decimal::ZERO,
            payment_method: payload.payment_method,
            payment_status: payload.payment_status,
            issue_date: payload.issue_date.unwrap_or(now),
            due_date: payload.due_date,
            notes: payload.notes,
            status: payload.status,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        reprice_invoice(&mut invoice, payload.total)?;

        let invoice = self.repo.create(invoice).await?;
        tracing::info!(invoice_id = %invoice.id, number = %invoice.number, total = %invoice.total, "Nota fiscal emitida");
        Ok(invoice)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateInvoicePayload) -> Result<Invoice, AppError> {
        if let Some(method) = payload.payment_method {
            method.ensure_direct("paymentMethod")?;
        }

        let mut tx = self.pool.begin().await?;

        let mut invoice = self.records.find_by_id_for_update(&mut *tx, id).await?;
        let submitted = payload.apply(&mut invoice);
        reprice_invoice(&mut invoice, submitted)?;
        let invoice = self.repo.update(&mut *tx, &invoice).await?;

        tx.commit().await?;
        Ok(invoice)
    }

    /// Aceita o número com ou sem zeros à esquerda ("42" ou "000042").
    pub async fn find_by_number(&self, number: &str) -> Result<Invoice, AppError> {
        let number = number.trim();
        let number = match number.parse::<i64>() {
            Ok(seq) => format_invoice_number(seq),
            Err(_) => number.to_string(),
        };

        self.records
            .find_one_active_by("number", number)
            .await?
            .ok_or_else(|| AppError::NotFound(Invoice::NOT_FOUND.into()))
    }

    pub async fn find_by_status(&self, status: InvoiceStatus) -> Result<Vec<Invoice>, AppError> {
        self.records.find_active_by("status", status).await
    }

    pub async fn find_by_client(&self, client_id: Uuid) -> Result<Vec<Invoice>, AppError> {
        self.records.find_active_by("client_id", client_id).await
    }
}
