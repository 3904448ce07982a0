// src/models/ticket.rs
//
// Ordem de serviço: problema relatado, diagnóstico e acompanhamento.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::non_negative_amount;

// Mapeia o CREATE TYPE ticket_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_status")]
pub enum TicketStatus {
    #[default]
    Pendente,
    #[sqlx(rename = "Em Andamento")]
    #[serde(rename = "Em Andamento")]
    EmAndamento,
    #[sqlx(rename = "Aguardando Peças")]
    #[serde(rename = "Aguardando Peças")]
    AguardandoPecas,
    #[sqlx(rename = "Concluído")]
    #[serde(rename = "Concluído")]
    Concluido,
    Cancelado,
}

// Mapeia o CREATE TYPE ticket_priority do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ticket_priority")]
pub enum TicketPriority {
    Baixa,
    #[default]
    #[sqlx(rename = "Média")]
    #[serde(rename = "Média")]
    Media,
    Alta,
    Urgente,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: Uuid,
    pub issue: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub description: Option<String>,
    pub diagnosis: Option<String>,
    pub solution: Option<String>,
    pub estimated_cost: Option<Decimal>,
    pub actual_cost: Option<Decimal>,
    pub estimated_time: Option<Decimal>,
    pub actual_time: Option<Decimal>,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub service_ids: Vec<Uuid>,
    pub payment_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub completion_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,

    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Troca o status. `start_date` é marcado na primeira entrada em
    /// "Em Andamento" e `completion_date` na primeira em "Concluído";
    /// nenhum dos dois é sobrescrito depois.
    pub fn apply_status(&mut self, status: TicketStatus, now: DateTime<Utc>) {
        self.status = status;
        match status {
            TicketStatus::EmAndamento if self.start_date.is_none() => self.start_date = Some(now),
            TicketStatus::Concluido if self.completion_date.is_none() => {
                self.completion_date = Some(now)
            }
            _ => {}
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketPayload {
    #[validate(length(min = 5, max = 200, message = "Problema deve ter entre 5 e 200 caracteres"))]
    pub issue: String,

    #[serde(default)]
    pub status: TicketStatus,

    #[serde(default)]
    pub priority: TicketPriority,

    #[validate(length(max = 1000, message = "Descrição deve ter no máximo 1000 caracteres"))]
    pub description: Option<String>,

    #[validate(length(max = 1000, message = "Diagnóstico deve ter no máximo 1000 caracteres"))]
    pub diagnosis: Option<String>,

    #[validate(length(max = 1000, message = "Solução deve ter no máximo 1000 caracteres"))]
    pub solution: Option<String>,

    #[validate(custom(function = "non_negative_amount"))]
    pub estimated_cost: Option<Decimal>,

    #[validate(custom(function = "non_negative_amount"))]
    pub actual_cost: Option<Decimal>,

    #[validate(custom(function = "non_negative_amount"))]
    pub estimated_time: Option<Decimal>,

    #[validate(custom(function = "non_negative_amount"))]
    pub actual_time: Option<Decimal>,

    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub employee_id: Option<Uuid>,

    #[serde(default)]
    pub service_ids: Vec<Uuid>,

    pub payment_id: Option<Uuid>,

    #[validate(length(max = 1000, message = "Notas devem ter no máximo 1000 caracteres"))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketPayload {
    #[validate(length(min = 5, max = 200, message = "Problema deve ter entre 5 e 200 caracteres"))]
    pub issue: Option<String>,

    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,

    #[validate(length(max = 1000, message = "Descrição deve ter no máximo 1000 caracteres"))]
    pub description: Option<String>,

    #[validate(length(max = 1000, message = "Diagnóstico deve ter no máximo 1000 caracteres"))]
    pub diagnosis: Option<String>,

    #[validate(length(max = 1000, message = "Solução deve ter no máximo 1000 caracteres"))]
    pub solution: Option<String>,

    #[validate(custom(function = "non_negative_amount"))]
    pub estimated_cost: Option<Decimal>,

    #[validate(custom(function = "non_negative_amount"))]
    pub actual_cost: Option<Decimal>,

    #[validate(custom(function = "non_negative_amount"))]
    pub estimated_time: Option<Decimal>,

    #[validate(custom(function = "non_negative_amount"))]
    pub actual_time: Option<Decimal>,

    pub client_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub service_ids: Option<Vec<Uuid>>,
    pub payment_id: Option<Uuid>,

    #[validate(length(max = 1000, message = "Notas devem ter no máximo 1000 caracteres"))]
    pub notes: Option<String>,
}

impl UpdateTicketPayload {
    pub fn apply(self, ticket: &mut Ticket, now: DateTime<Utc>) {
        if let Some(v) = self.issue {
            ticket.issue = v;
        }
        if let Some(v) = self.status {
            ticket.apply_status(v, now);
        }
        if let Some(v) = self.priority {
            ticket.priority = v;
        }
        if self.description.is_some() {
            ticket.description = self.description;
        }
        if self.diagnosis.is_some() {
            ticket.diagnosis = self.diagnosis;
        }
        if self.solution.is_some() {
            ticket.solution = self.solution;
        }
        if self.estimated_cost.is_some() {
            ticket.estimated_cost = self.estimated_cost;
        }
        if self.actual_cost.is_some() {
            ticket.actual_cost = self.actual_cost;
        }
        if self.estimated_time.is_some() {
            ticket.estimated_time = self.estimated_time;
        }
        if self.actual_time.is_some() {
            ticket.actual_time = self.actual_time;
        }
        if let Some(v) = self.client_id {
            ticket.client_id = v;
        }
        if let Some(v) = self.vehicle_id {
            ticket.vehicle_id = v;
        }
        if self.employee_id.is_some() {
            ticket.employee_id = self.employee_id;
        }
        if let Some(v) = self.service_ids {
            ticket.service_ids = v;
        }
        if self.payment_id.is_some() {
            ticket.payment_id = self.payment_id;
        }
        if self.notes.is_some() {
            ticket.notes = self.notes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ticket() -> Ticket {
        let now = Utc::now();
        Ticket {
            id: Uuid::new_v4(),
            issue: "Barulho na suspensão".into(),
            status: TicketStatus::Pendente,
            priority: TicketPriority::Media,
            description: None,
            diagnosis: None,
            solution: None,
            estimated_cost: None,
            actual_cost: None,
            estimated_time: None,
            actual_time: None,
            client_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            employee_id: None,
            service_ids: vec![],
            payment_id: None,
            start_date: None,
            completion_date: None,
            notes: None,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn start_date_is_set_once() {
        let t0 = Utc::now();
        let t1 = t0 + Duration::hours(2);
        let mut t = ticket();

        t.apply_status(TicketStatus::EmAndamento, t0);
        assert_eq!(t.start_date, Some(t0));

        t.apply_status(TicketStatus::AguardandoPecas, t1);
        t.apply_status(TicketStatus::EmAndamento, t1);
        assert_eq!(t.start_date, Some(t0));
        assert_eq!(t.completion_date, None);
    }

    #[test]
    fn completion_date_is_set_once() {
        let t0 = Utc::now();
        let mut t = ticket();
        t.apply_status(TicketStatus::Concluido, t0);
        t.apply_status(TicketStatus::Concluido, t0 + Duration::days(1));
        assert_eq!(t.completion_date, Some(t0));
        assert_eq!(t.start_date, None);
    }

    #[test]
    fn patch_without_status_keeps_dates() {
        let t0 = Utc::now();
        let mut t = ticket();
        t.apply_status(TicketStatus::EmAndamento, t0);
        UpdateTicketPayload {
            diagnosis: Some("Bucha da bandeja gasta".into()),
            ..Default::default()
        }
        .apply(&mut t, t0 + Duration::hours(1));
        assert_eq!(t.status, TicketStatus::EmAndamento);
        assert_eq!(t.start_date, Some(t0));
    }

    #[test]
    fn priority_defaults_to_media() {
        assert_eq!(serde_json::to_string(&TicketPriority::default()).unwrap(), "\"Média\"");
    }
}
