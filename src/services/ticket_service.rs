// src/services/ticket_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{SoftDeleteRepository, TicketRepository},
    models::ticket::{CreateTicketPayload, Ticket, TicketStatus, UpdateTicketPayload},
};

#[derive(Clone)]
pub struct TicketService {
    repo: TicketRepository,
    records: SoftDeleteRepository<Ticket>,
    pool: PgPool,
}

impl TicketService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: TicketRepository::new(pool.clone()),
            records: SoftDeleteRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn records(&self) -> &SoftDeleteRepository<Ticket> {
        &self.records
    }

    pub async fn create(&self, payload: CreateTicketPayload) -> Result<Ticket, AppError> {
        let now = Utc::now();
        let mut ticket = Ticket {
            id: Uuid::new_v4(),
            issue: payload.issue.trim().to_string(),
            status: TicketStatus::default(),
            priority: payload.priority,
            description: payload.description,
            diagnosis: payload.diagnosis,
            solution: payload.solution,
            estimated_cost: payload.estimated_cost,
            actual_cost: payload.actual_cost,
            estimated_time: payload.estimated_time,
            actual_time: payload.actual_time,
            client_id: payload.client_id,
            vehicle_id: payload.vehicle_id,
            employee_id: payload.employee_id,
            service_ids: payload.service_ids,
            payment_id: payload.payment_id,
            start_date: None,
            completion_date: None,
            notes: payload.notes,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        ticket.apply_status(payload.status, now);

        let ticket = self.repo.insert(&ticket).await?;
        tracing::info!(ticket_id = %ticket.id, status = ?ticket.status, "Ticket criado");
        Ok(ticket)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateTicketPayload) -> Result<Ticket, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut ticket = self.records.find_by_id_for_update(&mut *tx, id).await?;
        payload.apply(&mut ticket, Utc::now());
        let ticket = self.repo.update(&mut *tx, &ticket).await?;

        tx.commit().await?;
        Ok(ticket)
    }

    pub async fn find_by_status(&self, status: TicketStatus) -> Result<Vec<Ticket>, AppError> {
        self.records.find_active_by("status", status).await
    }

    pub async fn find_by_client(&self, client_id: Uuid) -> Result<Vec<Ticket>, AppError> {
        self.records.find_active_by("client_id", client_id).await
    }
}
