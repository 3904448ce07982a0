// src/db/ticket_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::common::db_utils::map_db_error;
use crate::common::error::AppError;
use crate::db::soft_delete::SoftDeletable;
use crate::models::ticket::Ticket;

impl SoftDeletable for Ticket {
    const TABLE: &'static str = "tickets";
    const NOT_FOUND: &'static str = "Ticket não encontrado";
}

#[derive(Clone)]
pub struct TicketRepository {
    pool: PgPool,
}

impl TicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, ticket: &Ticket) -> Result<Ticket, AppError> {
        sqlx::query_as::<_, Ticket>(
            r#"
            INSERT INTO tickets (
                id, issue, status, priority, description, diagnosis, solution,
                estimated_cost, actual_cost, estimated_time, actual_time,
                client_id, vehicle_id, employee_id, service_ids, payment_id,
                start_date, completion_date, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(ticket.id)
        .bind(&ticket.issue)
        .bind(ticket.status)
        .bind(ticket.priority)
        .bind(&ticket.description)
        .bind(&ticket.diagnosis)
        .bind(&ticket.solution)
        .bind(ticket.estimated_cost)
        .bind(ticket.actual_cost)
        .bind(ticket.estimated_time)
        .bind(ticket.actual_time)
        .bind(ticket.client_id)
        .bind(ticket.vehicle_id)
        .bind(ticket.employee_id)
        .bind(&ticket.service_ids)
        .bind(ticket.payment_id)
        .bind(ticket.start_date)
        .bind(ticket.completion_date)
        .bind(&ticket.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, &[]))
    }

    pub async fn update<'e, E>(&self, executor: E, ticket: &Ticket) -> Result<Ticket, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Ticket>(
            r#"
            UPDATE tickets
            SET issue = $2, status = $3, priority = $4, description = $5, diagnosis = $6,
                solution = $7, estimated_cost = $8, actual_cost = $9, estimated_time = $10,
                actual_time = $11, client_id = $12, vehicle_id = $13, employee_id = $14,
                service_ids = $15, payment_id = $16, start_date = $17, completion_date = $18,
                notes = $19, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(ticket.id)
        .bind(&ticket.issue)
        .bind(ticket.status)
        .bind(ticket.priority)
        .bind(&ticket.description)
        .bind(&ticket.diagnosis)
        .bind(&ticket.solution)
        .bind(ticket.estimated_cost)
        .bind(ticket.actual_cost)
        .bind(ticket.estimated_time)
        .bind(ticket.actual_time)
        .bind(ticket.client_id)
        .bind(ticket.vehicle_id)
        .bind(ticket.employee_id)
        .bind(&ticket.service_ids)
        .bind(ticket.payment_id)
        .bind(ticket.start_date)
        .bind(ticket.completion_date)
        .bind(&ticket.notes)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, &[]))
    }
}
