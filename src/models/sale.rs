// src/models/sale.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{non_negative_amount, positive_amount};
use crate::models::payment::default_quantity;

// Mapeia o CREATE TYPE sale_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sale_status")]
pub enum SaleStatus {
    #[default]
    Pendente,
    Confirmada,
    #[sqlx(rename = "Concluída")]
    #[serde(rename = "Concluída")]
    Concluida,
    Cancelada,
}

/// Item de venda (coluna JSONB `items`). `total_price` é sempre calculado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub service_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub status: SaleStatus,
    pub total_amount: Decimal,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub service_ids: Vec<Uuid>,
    pub ticket_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,
    pub discount: Decimal,
    pub tax: Decimal,
    pub observations: Option<String>,
    #[sqlx(json)]
    pub items: Vec<SaleItem>,

    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemPayload {
    pub service_id: Uuid,

    #[validate(range(min = 1, message = "Quantidade deve ser maior que 0"))]
    #[serde(default = "default_quantity")]
    pub quantity: i32,

    #[validate(custom(function = "positive_amount"))]
    pub unit_price: Decimal,
}

impl From<SaleItemPayload> for SaleItem {
    fn from(p: SaleItemPayload) -> Self {
        Self {
            service_id: p.service_id,
            quantity: p.quantity,
            unit_price: p.unit_price,
            total_price: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    pub date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub status: SaleStatus,

    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub employee_id: Option<Uuid>,

    #[serde(default)]
    pub service_ids: Vec<Uuid>,

    pub ticket_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,

    #[validate(custom(function = "non_negative_amount"))]
    #[serde(default)]
    pub discount: Decimal,

    #[validate(custom(function = "non_negative_amount"))]
    #[serde(default)]
    pub tax: Decimal,

    /// Opcional. Se enviado, precisa bater com o valor calculado.
    pub total_amount: Option<Decimal>,

    #[validate(length(max = 500, message = "Observações devem ter no máximo 500 caracteres"))]
    pub observations: Option<String>,

    #[validate(nested)]
    #[serde(default)]
    pub items: Vec<SaleItemPayload>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSalePayload {
    pub date: Option<DateTime<Utc>>,
    pub status: Option<SaleStatus>,
    pub client_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,
    pub service_ids: Option<Vec<Uuid>>,
    pub ticket_id: Option<Uuid>,
    pub payment_id: Option<Uuid>,

    #[validate(custom(function = "non_negative_amount"))]
    pub discount: Option<Decimal>,

    #[validate(custom(function = "non_negative_amount"))]
    pub tax: Option<Decimal>,

    pub total_amount: Option<Decimal>,

    #[validate(length(max = 500, message = "Observações devem ter no máximo 500 caracteres"))]
    pub observations: Option<String>,

    #[validate(nested)]
    pub items: Option<Vec<SaleItemPayload>>,
}

impl UpdateSalePayload {
    /// Aplica o patch. O total enviado (se houver) é devolvido para conferência.
    pub fn apply(self, sale: &mut Sale) -> Option<Decimal> {
        if let Some(v) = self.date {
            sale.date = v;
        }
        if let Some(v) = self.status {
            sale.status = v;
        }
        if let Some(v) = self.client_id {
            sale.client_id = v;
        }
        if let Some(v) = self.vehicle_id {
            sale.vehicle_id = v;
        }
        if self.employee_id.is_some() {
            sale.employee_id = self.employee_id;
        }
        if self.ticket_id.is_some() {
            sale.ticket_id = self.ticket_id;
        }
        if self.payment_id.is_some() {
            sale.payment_id = self.payment_id;
        }
        if let Some(v) = self.discount {
            sale.discount = v;
        }
        if let Some(v) = self.tax {
            sale.tax = v;
        }
        if self.observations.is_some() {
            sale.observations = self.observations;
        }
        // O lado que não veio é esvaziado e refeito a partir do outro:
        // serviços sem itens usam o catálogo, itens sem serviços geram os ids.
        match (self.service_ids, self.items) {
            (Some(ids), Some(items)) => {
                sale.service_ids = ids;
                sale.items = items.into_iter().map(SaleItem::from).collect();
            }
            (Some(ids), None) => {
                sale.service_ids = ids;
                sale.items.clear();
            }
            (None, Some(items)) => {
                sale.items = items.into_iter().map(SaleItem::from).collect();
                sale.service_ids.clear();
            }
            (None, None) => {}
        }
        self.total_amount
    }
}

/// Query string de `/sales/date-range`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_item_errors_are_reported() {
        let payload: CreateSalePayload = serde_json::from_value(serde_json::json!({
            "clientId": Uuid::new_v4(),
            "vehicleId": Uuid::new_v4(),
            "items": [
                { "serviceId": Uuid::new_v4(), "quantity": 0, "unitPrice": 10 }
            ]
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.errors().contains_key("items"));
    }

    fn sale_with(service_id: Uuid) -> Sale {
        let now = Utc::now();
        Sale {
            id: Uuid::new_v4(),
            date: now,
            status: SaleStatus::Pendente,
            total_amount: Decimal::new(100, 0),
            client_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            employee_id: None,
            service_ids: vec![service_id],
            ticket_id: None,
            payment_id: None,
            discount: Decimal::ZERO,
            tax: Decimal::ZERO,
            observations: None,
            items: vec![SaleItem {
                service_id,
                quantity: 1,
                unit_price: Decimal::new(100, 0),
                total_price: Decimal::new(100, 0),
            }],
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn new_items_without_service_ids_drop_the_old_ids() {
        let old = Uuid::new_v4();
        let new = Uuid::new_v4();
        let mut sale = sale_with(old);

        let payload: UpdateSalePayload = serde_json::from_value(serde_json::json!({
            "items": [{ "serviceId": new, "quantity": 2, "unitPrice": 50 }]
        }))
        .unwrap();
        payload.apply(&mut sale);

        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].service_id, new);
        // vazio: o serviço de vendas refaz os ids a partir dos itens
        assert!(sale.service_ids.is_empty());
    }

    #[test]
    fn new_service_ids_without_items_drop_the_old_items() {
        let new = Uuid::new_v4();
        let mut sale = sale_with(Uuid::new_v4());

        let payload = UpdateSalePayload {
            service_ids: Some(vec![new]),
            ..Default::default()
        };
        payload.apply(&mut sale);

        assert_eq!(sale.service_ids, vec![new]);
        assert!(sale.items.is_empty());
    }

    #[test]
    fn untouched_lines_are_kept() {
        let id = Uuid::new_v4();
        let mut sale = sale_with(id);
        UpdateSalePayload {
            tax: Some(Decimal::new(5, 0)),
            ..Default::default()
        }
        .apply(&mut sale);
        assert_eq!(sale.service_ids, vec![id]);
        assert_eq!(sale.items.len(), 1);
    }

    #[test]
    fn status_uses_accented_label() {
        assert_eq!(serde_json::to_string(&SaleStatus::Concluida).unwrap(), "\"Concluída\"");
        assert_eq!(SaleStatus::default(), SaleStatus::Pendente);
    }
}
