// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::error::AppError;
use crate::common::validation::{non_negative_amount, positive_amount};

// Mapeia o CREATE TYPE payment_method do banco.
// `Débito Automático` só é aceito em lançamentos financeiros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method")]
pub enum PaymentMethod {
    #[sqlx(rename = "Cartão de Crédito")]
    #[serde(rename = "Cartão de Crédito")]
    CartaoCredito,
    #[sqlx(rename = "Cartão de Débito")]
    #[serde(rename = "Cartão de Débito")]
    CartaoDebito,
    #[default]
    Dinheiro,
    #[sqlx(rename = "PIX")]
    #[serde(rename = "PIX")]
    Pix,
    #[sqlx(rename = "Transferência Bancária")]
    #[serde(rename = "Transferência Bancária")]
    Transferencia,
    Cheque,
    #[sqlx(rename = "Débito Automático")]
    #[serde(rename = "Débito Automático")]
    DebitoAutomatico,
}

impl PaymentMethod {
    /// Pagamentos e notas não aceitam débito automático.
    pub fn ensure_direct(self, field: &str) -> Result<(), AppError> {
        if self == PaymentMethod::DebitoAutomatico {
            return Err(AppError::invalid(field, "Método de pagamento inválido"));
        }
        Ok(())
    }
}

// Mapeia o CREATE TYPE payment_status do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status")]
pub enum PaymentStatus {
    #[default]
    Pendente,
    Pago,
    Cancelado,
    Estornado,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub quantity: i32,
    pub base_amount: Decimal,
    pub discount: Decimal,
    pub total_amount: Decimal,
    pub service_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub notes: Option<String>,

    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    #[serde(default)]
    pub method: PaymentMethod,

    #[serde(default)]
    pub status: PaymentStatus,

    #[validate(length(min = 3, max = 100, message = "ID da transação deve ter entre 3 e 100 caracteres"))]
    pub transaction_id: Option<String>,

    #[validate(range(min = 1, message = "Quantidade deve ser maior que 0"))]
    #[serde(default = "default_quantity")]
    pub quantity: i32,

    #[validate(custom(function = "positive_amount"))]
    pub base_amount: Decimal,

    #[validate(custom(function = "non_negative_amount"))]
    #[serde(default)]
    pub discount: Decimal,

    /// Opcional. Se enviado, precisa bater com o valor calculado.
    pub total_amount: Option<Decimal>,

    pub service_id: Option<Uuid>,
    pub client_id: Option<Uuid>,

    #[validate(length(max = 500, message = "Notas devem ter no máximo 500 caracteres"))]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentPayload {
    pub method: Option<PaymentMethod>,
    pub status: Option<PaymentStatus>,

    #[validate(length(min = 3, max = 100, message = "ID da transação deve ter entre 3 e 100 caracteres"))]
    pub transaction_id: Option<String>,

    #[validate(range(min = 1, message = "Quantidade deve ser maior que 0"))]
    pub quantity: Option<i32>,

    #[validate(custom(function = "positive_amount"))]
    pub base_amount: Option<Decimal>,

    #[validate(custom(function = "non_negative_amount"))]
    pub discount: Option<Decimal>,

    pub total_amount: Option<Decimal>,

    pub service_id: Option<Uuid>,
    pub client_id: Option<Uuid>,

    #[validate(length(max = 500, message = "Notas devem ter no máximo 500 caracteres"))]
    pub notes: Option<String>,
}

impl UpdatePaymentPayload {
    /// Aplica o patch. O total enviado (se houver) é devolvido para conferência.
    pub fn apply(self, payment: &mut Payment) -> Option<Decimal> {
        if let Some(v) = self.method {
            payment.method = v;
        }
        if let Some(v) = self.status {
            payment.status = v;
        }
        if self.transaction_id.is_some() {
            payment.transaction_id = self.transaction_id;
        }
        if let Some(v) = self.quantity {
            payment.quantity = v;
        }
        if let Some(v) = self.base_amount {
            payment.base_amount = v;
        }
        if let Some(v) = self.discount {
            payment.discount = v;
        }
        if self.service_id.is_some() {
            payment.service_id = self.service_id;
        }
        if self.client_id.is_some() {
            payment.client_id = self.client_id;
        }
        if self.notes.is_some() {
            payment.notes = self.notes;
        }
        self.total_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_use_display_labels() {
        let m: PaymentMethod = serde_json::from_str("\"Cartão de Crédito\"").unwrap();
        assert_eq!(m, PaymentMethod::CartaoCredito);
        assert_eq!(serde_json::to_string(&PaymentMethod::Pix).unwrap(), "\"PIX\"");
    }

    #[test]
    fn automatic_debit_is_not_a_direct_method() {
        assert!(PaymentMethod::DebitoAutomatico.ensure_direct("method").is_err());
        assert!(PaymentMethod::Pix.ensure_direct("method").is_ok());
    }

    #[test]
    fn create_defaults() {
        let payload: CreatePaymentPayload =
            serde_json::from_value(serde_json::json!({ "baseAmount": 100.0 })).unwrap();
        assert_eq!(payload.method, PaymentMethod::Dinheiro);
        assert_eq!(payload.status, PaymentStatus::Pendente);
        assert_eq!(payload.quantity, 1);
        assert_eq!(payload.discount, Decimal::ZERO);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn amounts_beyond_cents_or_column_range_are_rejected() {
        // 0,333 seria gravado como 0,33 e o total deixaria de bater
        let payload: CreatePaymentPayload =
            serde_json::from_value(serde_json::json!({ "baseAmount": "0.333", "quantity": 3 })).unwrap();
        assert!(payload.validate().unwrap_err().field_errors().contains_key("base_amount"));

        let payload: CreatePaymentPayload = serde_json::from_value(serde_json::json!({
            "baseAmount": "79228162514264337593543950335",
            "quantity": 2
        }))
        .unwrap();
        assert!(payload.validate().unwrap_err().field_errors().contains_key("base_amount"));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let payload = UpdatePaymentPayload {
            quantity: Some(0),
            ..Default::default()
        };
        assert!(payload.validate().unwrap_err().field_errors().contains_key("quantity"));
    }
}
