// src/models/client.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{CPF_RE, PHONE_RE};
use crate::models::employee::default_true;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub cpf: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub is_active: bool,

    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientPayload {
    #[validate(length(min = 2, max = 100, message = "Nome deve ter entre 2 e 100 caracteres"))]
    pub full_name: String,

    #[validate(email(message = "Email inválido"))]
    pub email: String,

    #[validate(regex(path = *PHONE_RE, message = "Telefone inválido"))]
    pub phone: String,

    #[validate(length(min = 10, max = 200, message = "Endereço deve ter entre 10 e 200 caracteres"))]
    pub address: String,

    #[validate(regex(path = *CPF_RE, message = "CPF deve estar no formato XXX.XXX.XXX-XX"))]
    pub cpf: Option<String>,

    pub birth_date: Option<NaiveDate>,

    #[validate(length(max = 500, message = "Notas devem ter no máximo 500 caracteres"))]
    pub notes: Option<String>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientPayload {
    #[validate(length(min = 2, max = 100, message = "Nome deve ter entre 2 e 100 caracteres"))]
    pub full_name: Option<String>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_RE, message = "Telefone inválido"))]
    pub phone: Option<String>,

    #[validate(length(min = 10, max = 200, message = "Endereço deve ter entre 10 e 200 caracteres"))]
    pub address: Option<String>,

    #[validate(regex(path = *CPF_RE, message = "CPF deve estar no formato XXX.XXX.XXX-XX"))]
    pub cpf: Option<String>,

    pub birth_date: Option<NaiveDate>,

    #[validate(length(max = 500, message = "Notas devem ter no máximo 500 caracteres"))]
    pub notes: Option<String>,

    pub is_active: Option<bool>,
}

impl UpdateClientPayload {
    pub fn apply(self, client: &mut Client) {
        if let Some(v) = self.full_name {
            client.full_name = v.trim().to_string();
        }
        if let Some(v) = self.email {
            client.email = v.trim().to_lowercase();
        }
        if let Some(v) = self.phone {
            client.phone = v;
        }
        if let Some(v) = self.address {
            client.address = v;
        }
        if self.cpf.is_some() {
            client.cpf = self.cpf;
        }
        if self.birth_date.is_some() {
            client.birth_date = self.birth_date;
        }
        if self.notes.is_some() {
            client.notes = self.notes;
        }
        if let Some(v) = self.is_active {
            client.is_active = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Client {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4(),
            full_name: "Ana Pereira".into(),
            email: "ana@email.com".into(),
            phone: "(11) 91234-5678".into(),
            address: "Rua das Flores, 123 - Centro".into(),
            cpf: None,
            birth_date: None,
            notes: None,
            is_active: true,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn patch_only_touches_sent_fields() {
        let mut client = stored();
        UpdateClientPayload {
            email: Some("  ANA.P@Email.com ".into()),
            ..Default::default()
        }
        .apply(&mut client);

        assert_eq!(client.email, "ana.p@email.com");
        assert_eq!(client.full_name, "Ana Pereira");
        assert_eq!(client.phone, "(11) 91234-5678");
    }

    #[test]
    fn short_address_is_rejected() {
        let payload: CreateClientPayload = serde_json::from_value(serde_json::json!({
            "fullName": "Ana Pereira",
            "email": "ana@email.com",
            "phone": "(11) 91234-5678",
            "address": "Rua A"
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("address"));
    }
}
