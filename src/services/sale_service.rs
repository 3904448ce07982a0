// src/services/sale_service.rs

use chrono::{Days, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{SaleRepository, ServiceRepository, SoftDeleteRepository},
    models::sale::{CreateSalePayload, Sale, SaleItem, SaleStatus, UpdateSalePayload},
    services::pricing::{items_from_catalog, reprice_sale, service_ids_from_items},
};

#[derive(Clone)]
pub struct SaleService {
    repo: SaleRepository,
    records: SoftDeleteRepository<Sale>,
    catalog: ServiceRepository,
    pool: PgPool,
}

impl SaleService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: SaleRepository::new(pool.clone()),
            records: SoftDeleteRepository::new(pool.clone()),
            catalog: ServiceRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn records(&self) -> &SoftDeleteRepository<Sale> {
        &self.records
    }

    pub async fn create(&self, payload: CreateSalePayload) -> Result<Sale, AppError> {
        let now = Utc::now();
        let mut sale = Sale {
            id: Uuid::new_v4(),
            date: payload.date.unwrap_or(now),
            status: payload.status,
            total_amount: Decimal::ZERO,
            client_id: payload.client_id,
            vehicle_id: payload.vehicle_id,
            employee_id: payload.employee_id,
            service_ids: payload.service_ids,
            ticket_id: payload.ticket_id,
            payment_id: payload.payment_id,
            discount: payload.discount,
            tax: payload.tax,
            observations: payload.observations,
            items: payload.items.into_iter().map(SaleItem::from).collect(),
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };

        let mut conn = self.pool.acquire().await?;
        self.fill_items(&mut *conn, &mut sale).await?;
        drop(conn);

        reprice_sale(&mut sale, payload.total_amount)?;

        let sale = self.repo.insert(&sale).await?;
        tracing::info!(sale_id = %sale.id, total = %sale.total_amount, "Venda criada");
        Ok(sale)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateSalePayload) -> Result<Sale, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut sale = self.records.find_by_id_for_update(&mut *tx, id).await?;
        let submitted = payload.apply(&mut sale);
        self.fill_items(&mut *tx, &mut sale).await?;
        reprice_sale(&mut sale, submitted)?;

        let sale = self.repo.update(&mut *tx, &sale).await?;
        tx.commit().await?;
        Ok(sale)
    }

    pub async fn find_by_status(&self, status: SaleStatus) -> Result<Vec<Sale>, AppError> {
        self.records.find_active_by("status", status).await
    }

    pub async fn find_by_client(&self, client_id: Uuid) -> Result<Vec<Sale>, AppError> {
        self.records.find_active_by("client_id", client_id).await
    }

    /// Vendas entre `start` e `end`, ambos os dias inclusive.
    pub async fn find_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Sale>, AppError> {
        if end < start {
            return Err(AppError::invalid(
                "endDate",
                "Data final deve ser igual ou posterior à data inicial",
            ));
        }
        let next_day = end
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::invalid("endDate", "Data final inválida"))?;

        let start = start.and_time(NaiveTime::MIN).and_utc();
        let end = next_day.and_time(NaiveTime::MIN).and_utc();
        self.repo.find_by_date_range(start, end).await
    }

    // Completa itens ou serviços que vieram vazios.
    async fn fill_items(&self, conn: &mut PgConnection, sale: &mut Sale) -> Result<(), AppError> {
        if sale.items.is_empty() {
            if sale.service_ids.is_empty() {
                return Err(AppError::invalid(
                    "serviceIds",
                    "A venda deve ter ao menos um serviço",
                ));
            }
            let catalog = self
                .catalog
                .find_active_by_ids(&mut *conn, &sale.service_ids)
                .await?;
            sale.items = items_from_catalog(&sale.service_ids, &catalog)?;
        } else if sale.service_ids.is_empty() {
            sale.service_ids = service_ids_from_items(&sale.items);
        }
        Ok(())
    }
}
