// src/models/employee.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{non_negative_amount, CPF_RE, PHONE_RE};

// Mapeia o CREATE TYPE employee_role do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employee_role")]
pub enum EmployeeRole {
    #[sqlx(rename = "Mecânico")]
    #[serde(rename = "Mecânico")]
    Mecanico,
    Gerente,
    Atendente,
    Supervisor,
    #[sqlx(rename = "Técnico")]
    #[serde(rename = "Técnico")]
    Tecnico,
    Auxiliar,
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub name: String,
    pub role: EmployeeRole,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cpf: Option<String>,
    pub salary: Option<Decimal>,
    pub hire_date: Option<NaiveDate>,
    pub is_active: bool,
    pub specializations: Vec<String>,
    pub notes: Option<String>,

    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeePayload {
    #[validate(length(min = 2, max = 100, message = "Nome deve ter entre 2 e 100 caracteres"))]
    pub name: String,

    pub role: EmployeeRole,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_RE, message = "Telefone inválido"))]
    pub phone: Option<String>,

    #[validate(regex(path = *CPF_RE, message = "CPF deve estar no formato XXX.XXX.XXX-XX"))]
    pub cpf: Option<String>,

    #[validate(custom(function = "non_negative_amount"))]
    pub salary: Option<Decimal>,

    pub hire_date: Option<NaiveDate>,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub specializations: Vec<String>,

    #[validate(length(max = 500, message = "Notas devem ter no máximo 500 caracteres"))]
    pub notes: Option<String>,
}

/// PUT parcial: só os campos enviados são alterados.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeePayload {
    #[validate(length(min = 2, max = 100, message = "Nome deve ter entre 2 e 100 caracteres"))]
    pub name: Option<String>,

    pub role: Option<EmployeeRole>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    #[validate(regex(path = *PHONE_RE, message = "Telefone inválido"))]
    pub phone: Option<String>,

    #[validate(regex(path = *CPF_RE, message = "CPF deve estar no formato XXX.XXX.XXX-XX"))]
    pub cpf: Option<String>,

    #[validate(custom(function = "non_negative_amount"))]
    pub salary: Option<Decimal>,

    pub hire_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub specializations: Option<Vec<String>>,

    #[validate(length(max = 500, message = "Notas devem ter no máximo 500 caracteres"))]
    pub notes: Option<String>,
}

impl UpdateEmployeePayload {
    pub fn apply(self, employee: &mut Employee) {
        if let Some(v) = self.name {
            employee.name = v;
        }
        if let Some(v) = self.role {
            employee.role = v;
        }
        if let Some(v) = self.email {
            employee.email = Some(v.to_lowercase());
        }
        if self.phone.is_some() {
            employee.phone = self.phone;
        }
        if self.cpf.is_some() {
            employee.cpf = self.cpf;
        }
        if self.salary.is_some() {
            employee.salary = self.salary;
        }
        if self.hire_date.is_some() {
            employee.hire_date = self.hire_date;
        }
        if let Some(v) = self.is_active {
            employee.is_active = v;
        }
        if let Some(v) = self.specializations {
            employee.specializations = v;
        }
        if self.notes.is_some() {
            employee.notes = self.notes;
        }
    }
}

pub(crate) fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_use_portuguese_labels() {
        let role: EmployeeRole = serde_json::from_str("\"Mecânico\"").unwrap();
        assert_eq!(role, EmployeeRole::Mecanico);
        assert_eq!(serde_json::to_string(&EmployeeRole::Tecnico).unwrap(), "\"Técnico\"");
        assert!(serde_json::from_str::<EmployeeRole>("\"Faxineiro\"").is_err());
    }

    #[test]
    fn create_defaults_to_active() {
        let payload: CreateEmployeePayload = serde_json::from_value(serde_json::json!({
            "name": "Carlos Souza",
            "role": "Gerente",
            "cpf": "123.456.789-09"
        }))
        .unwrap();
        assert!(payload.is_active);
        assert!(payload.specializations.is_empty());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn negative_salary_is_rejected() {
        let payload = UpdateEmployeePayload {
            salary: Some(Decimal::new(-100, 0)),
            ..Default::default()
        };
        assert!(payload.validate().unwrap_err().field_errors().contains_key("salary"));
    }
}
