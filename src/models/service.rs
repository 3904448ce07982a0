// src/models/service.rs
//
// Catálogo de serviços oferecidos pela oficina (troca de óleo, alinhamento...).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{positive_amount, URL_RE};
use crate::models::employee::default_true;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub item: String,
    pub description: String,
    pub image: Option<String>,
    pub price: Decimal,
    pub category: String,
    pub is_active: bool,

    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicePayload {
    #[validate(length(min = 3, max = 100, message = "Item deve ter entre 3 e 100 caracteres"))]
    pub item: String,

    #[validate(length(min = 10, max = 500, message = "Descrição deve ter entre 10 e 500 caracteres"))]
    pub description: String,

    #[validate(regex(path = *URL_RE, message = "URL da imagem inválida"))]
    pub image: Option<String>,

    #[validate(custom(function = "positive_amount"))]
    pub price: Decimal,

    #[validate(length(min = 3, max = 50, message = "Categoria deve ter entre 3 e 50 caracteres"))]
    pub category: String,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServicePayload {
    #[validate(length(min = 3, max = 100, message = "Item deve ter entre 3 e 100 caracteres"))]
    pub item: Option<String>,

    #[validate(length(min = 10, max = 500, message = "Descrição deve ter entre 10 e 500 caracteres"))]
    pub description: Option<String>,

    #[validate(regex(path = *URL_RE, message = "URL da imagem inválida"))]
    pub image: Option<String>,

    #[validate(custom(function = "positive_amount"))]
    pub price: Option<Decimal>,

    #[validate(length(min = 3, max = 50, message = "Categoria deve ter entre 3 e 50 caracteres"))]
    pub category: Option<String>,

    pub is_active: Option<bool>,
}

impl UpdateServicePayload {
    pub fn apply(self, service: &mut Service) {
        if let Some(v) = self.item {
            service.item = v;
        }
        if let Some(v) = self.description {
            service.description = v;
        }
        if self.image.is_some() {
            service.image = self.image;
        }
        if let Some(v) = self.price {
            service.price = v;
        }
        if let Some(v) = self.category {
            service.category = v;
        }
        if let Some(v) = self.is_active {
            service.is_active = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_must_be_positive() {
        let payload: CreateServicePayload = serde_json::from_value(serde_json::json!({
            "item": "Troca de óleo",
            "description": "Troca de óleo do motor com filtro",
            "price": 0,
            "category": "Manutenção"
        }))
        .unwrap();
        assert!(payload.validate().unwrap_err().field_errors().contains_key("price"));
    }

    #[test]
    fn image_must_be_http_url() {
        let payload = UpdateServicePayload {
            image: Some("ftp://imagens/oleo.png".into()),
            ..Default::default()
        };
        assert!(payload.validate().is_err());
    }
}
