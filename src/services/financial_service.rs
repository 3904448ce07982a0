// src/services/financial_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{FinancialRepository, SoftDeleteRepository},
    models::financial::{
        month_bounds, CreateFinancialPayload, Financial, FinancialStatus, MonthlyReport,
        UpdateFinancialPayload,
    },
};

#[derive(Clone)]
pub struct FinancialService {
    repo: FinancialRepository,
    records: SoftDeleteRepository<Financial>,
    pool: PgPool,
}

impl FinancialService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: FinancialRepository::new(pool.clone()),
            records: SoftDeleteRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn records(&self) -> &SoftDeleteRepository<Financial> {
        &self.records
    }

    pub async fn create(&self, payload: CreateFinancialPayload) -> Result<Financial, AppError> {
        let now = Utc::now();
        let entry = Financial {
            id: Uuid::new_v4(),
            kind: payload.kind,
            category: payload.category,
            description: payload.description.trim().to_string(),
            amount: payload.amount,
            date: payload.date.unwrap_or(now),
            due_date: payload.due_date,
            status: payload
                .status
                .unwrap_or_else(|| FinancialStatus::default_for(payload.kind)),
            payment_method: payload.payment_method,
            employee_id: payload.employee_id,
            sale_id: payload.sale_id,
            invoice_id: payload.invoice_id,
            supplier: payload.supplier,
            document: payload.document,
            is_recurring: payload.is_recurring,
            recurrence_type: payload.recurrence_type,
            notes: payload.notes,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        entry.check_consistency()?;

        let entry = self.repo.insert(&entry).await?;
        tracing::info!(
            financial_id = %entry.id,
            kind = ?entry.kind,
            amount = %entry.amount,
            "Lançamento financeiro criado"
        );
        Ok(entry)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateFinancialPayload) -> Result<Financial, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut entry = self.records.find_by_id_for_update(&mut *tx, id).await?;
        payload.apply(&mut entry);
        entry.check_consistency()?;
        let entry = self.repo.update(&mut *tx, &entry).await?;

        tx.commit().await?;
        Ok(entry)
    }

    pub async fn find_by_status(&self, status: FinancialStatus) -> Result<Vec<Financial>, AppError> {
        self.records.find_active_by("status", status).await
    }

    /// Resumo do mês agrupado por tipo e categoria.
    pub async fn monthly_report(&self, year: i32, month: u32) -> Result<MonthlyReport, AppError> {
        let (start, end) = month_bounds(year, month)?;
        let entries = self.repo.find_in_period(start, end).await?;
        Ok(MonthlyReport::build(year, month, &entries))
    }
}
