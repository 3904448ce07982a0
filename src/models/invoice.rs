// src/models/invoice.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{non_negative_amount, positive_amount};
use crate::models::payment::PaymentMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceType {
    #[default]
    Venda,
    Devolucao,
    Troca,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_status")]
pub enum InvoiceStatus {
    #[default]
    Emitida,
    Cancelada,
    Inutilizada,
}

// Status de pagamento da nota (sem "Estornado", ao contrário de Payment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_payment_status")]
pub enum InvoicePaymentStatus {
    #[default]
    Pendente,
    Pago,
    Cancelado,
}

/// Item da nota (coluna JSONB `items`). `total_price` é sempre calculado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub product_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    pub total_price: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub number: String,
    pub series: String,
    #[serde(rename = "type")]
    pub invoice_type: InvoiceType,
    pub client_id: Uuid,
    pub sale_id: Option<Uuid>,
    pub employee_id: Uuid,
    #[sqlx(json)]
    pub items: Vec<InvoiceItem>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    pub payment_status: InvoicePaymentStatus,
    pub issue_date: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub status: InvoiceStatus,

    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItemPayload {
    pub product_id: Option<Uuid>,
    pub service_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200, message = "Descrição do item é obrigatória"))]
    pub description: String,

    #[validate(range(min = 1, message = "Quantidade deve ser maior que 0"))]
    pub quantity: i32,

    #[validate(custom(function = "positive_amount"))]
    pub unit_price: Decimal,

    #[validate(custom(function = "non_negative_amount"))]
    #[serde(default)]
    pub discount: Decimal,
}

impl From<InvoiceItemPayload> for InvoiceItem {
    fn from(p: InvoiceItemPayload) -> Self {
        Self {
            product_id: p.product_id,
            service_id: p.service_id,
            description: p.description,
            quantity: p.quantity,
            unit_price: p.unit_price,
            discount: p.discount,
            total_price: Decimal::ZERO,
        }
    }
}

fn default_series() -> String {
    "001".to_string()
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoicePayload {
    #[validate(length(min = 1, max = 10, message = "Série inválida"))]
    #[serde(default = "default_series")]
    pub series: String,

    #[serde(rename = "type", default)]
    pub invoice_type: InvoiceType,

    pub client_id: Uuid,
    pub sale_id: Option<Uuid>,
    pub employee_id: Uuid,

    #[validate(length(min = 1, message = "A nota deve ter ao menos um item"), nested)]
    pub items: Vec<InvoiceItemPayload>,

    #[validate(custom(function = "non_negative_amount"))]
    #[serde(default)]
    pub discount: Decimal,

    #[validate(custom(function = "non_negative_amount"))]
    #[serde(default)]
    pub tax: Decimal,

    /// Opcional. Se enviado, precisa bater com o valor calculado.
    pub total: Option<Decimal>,

    pub payment_method: PaymentMethod,

    #[serde(default)]
    pub payment_status: InvoicePaymentStatus,

    pub issue_date: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,

    #[validate(length(max = 500, message = "Notas devem ter no máximo 500 caracteres"))]
    pub notes: Option<String>,

    #[serde(default)]
    pub status: InvoiceStatus,
}

// Número e série não mudam depois de emitida.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvoicePayload {
    #[serde(rename = "type")]
    pub invoice_type: Option<InvoiceType>,

    pub client_id: Option<Uuid>,
    pub sale_id: Option<Uuid>,
    pub employee_id: Option<Uuid>,

    #[validate(length(min = 1, message = "A nota deve ter ao menos um item"), nested)]
    pub items: Option<Vec<InvoiceItemPayload>>,

    #[validate(custom(function = "non_negative_amount"))]
    pub discount: Option<Decimal>,

    #[validate(custom(function = "non_negative_amount"))]
    pub tax: Option<Decimal>,

    pub total: Option<Decimal>,

    pub payment_method: Option<PaymentMethod>,
    pub payment_status: Option<InvoicePaymentStatus>,
    pub issue_date: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,

    #[validate(length(max = 500, message = "Notas devem ter no máximo 500 caracteres"))]
    pub notes: Option<String>,

    pub status: Option<InvoiceStatus>,
}

impl UpdateInvoicePayload {
    /// Aplica o patch. O total enviado (se houver) é devolvido para conferência.
    pub fn apply(self, invoice: &mut Invoice) -> Option<Decimal> {
        if let Some(v) = self.invoice_type {
            invoice.invoice_type = v;
        }
        if let Some(v) = self.client_id {
            invoice.client_id = v;
        }
        if self.sale_id.is_some() {
            invoice.sale_id = self.sale_id;
        }
        if let Some(v) = self.employee_id {
            invoice.employee_id = v;
        }
        if let Some(items) = self.items {
            invoice.items = items.into_iter().map(InvoiceItem::from).collect();
        }
        if let Some(v) = self.discount {
            invoice.discount = v;
        }
        if let Some(v) = self.tax {
            invoice.tax = v;
        }
        if let Some(v) = self.payment_method {
            invoice.payment_method = v;
        }
        if let Some(v) = self.payment_status {
            invoice.payment_status = v;
        }
        if let Some(v) = self.issue_date {
            invoice.issue_date = v;
        }
        if self.due_date.is_some() {
            invoice.due_date = self.due_date;
        }
        if self.notes.is_some() {
            invoice.notes = self.notes;
        }
        if let Some(v) = self.status {
            invoice.status = v;
        }
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_items_are_rejected() {
        let payload: CreateInvoicePayload = serde_json::from_value(serde_json::json!({
            "clientId": Uuid::new_v4(),
            "employeeId": Uuid::new_v4(),
            "items": [],
            "paymentMethod": "PIX"
        }))
        .unwrap();
        assert_eq!(payload.series, "001");
        assert_eq!(payload.invoice_type, InvoiceType::Venda);
        assert!(payload.validate().unwrap_err().errors().contains_key("items"));
    }

    #[test]
    fn invalid_item_is_reported_inside_items() {
        let payload: CreateInvoicePayload = serde_json::from_value(serde_json::json!({
            "clientId": Uuid::new_v4(),
            "employeeId": Uuid::new_v4(),
            "items": [{ "description": "Filtro de ar", "quantity": 1, "unitPrice": "10.005" }],
            "paymentMethod": "PIX"
        }))
        .unwrap();
        let err: crate::common::error::AppError = payload.validate().unwrap_err().into();
        match err {
            crate::common::error::AppError::ValidationError(fields) => {
                assert_eq!(fields[0].field, "items[0].unitPrice");
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn type_field_is_named_type() {
        let payload: UpdateInvoicePayload =
            serde_json::from_value(serde_json::json!({ "type": "devolucao" })).unwrap();
        assert_eq!(payload.invoice_type, Some(InvoiceType::Devolucao));
    }
}
