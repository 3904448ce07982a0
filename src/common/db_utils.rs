// src/common/db_utils.rs

use crate::common::error::AppError;

/// Associa o nome de um índice/constraint do Postgres ao campo do payload
/// e à mensagem devolvida ao cliente.
#[derive(Debug, Clone, Copy)]
pub struct Constraint {
    pub name: &'static str,
    pub field: &'static str,
    pub message: &'static str,
}

impl Constraint {
    pub const fn new(name: &'static str, field: &'static str, message: &'static str) -> Self {
        Self { name, field, message }
    }
}

/// Converte um erro do sqlx em AppError, traduzindo violações conhecidas.
///
/// - unique violation com constraint conhecida -> Conflict (409)
/// - foreign key violation -> ValidationError (referência inexistente)
/// - resto -> DatabaseError (500)
pub fn map_db_error(e: sqlx::Error, constraints: &[Constraint]) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(name) = db_err.constraint() {
                if let Some(c) = constraints.iter().find(|c| c.name == name) {
                    return AppError::Conflict {
                        field: c.field.to_string(),
                        message: c.message.to_string(),
                    };
                }
                return AppError::Conflict {
                    field: name.to_string(),
                    message: "Registro duplicado".to_string(),
                };
            }
        }

        if db_err.is_foreign_key_violation() {
            let field = db_err
                .constraint()
                .and_then(foreign_key_field)
                .unwrap_or("reference");
            return AppError::invalid(field, "Referência a um registro inexistente");
        }
    }
    e.into()
}

// "vehicles_client_id_fkey" -> "clientId"
fn foreign_key_field(constraint: &str) -> Option<&'static str> {
    const KNOWN: &[(&str, &str)] = &[
        ("client_id", "clientId"),
        ("vehicle_id", "vehicleId"),
        ("employee_id", "employeeId"),
        ("service_id", "serviceId"),
        ("sale_id", "saleId"),
        ("ticket_id", "ticketId"),
        ("payment_id", "paymentId"),
        ("invoice_id", "invoiceId"),
    ];
    KNOWN
        .iter()
        .find(|(column, _)| constraint.contains(column))
        .map(|(_, field)| *field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn foreign_key_constraint_names_map_to_payload_fields() {
        assert_eq!(foreign_key_field("vehicles_client_id_fkey"), Some("clientId"));
        assert_eq!(foreign_key_field("sales_employee_id_fkey"), Some("employeeId"));
        assert_eq!(foreign_key_field("whatever"), None);
    }

    #[test]
    fn non_database_errors_stay_internal() {
        let err = map_db_error(sqlx::Error::RowNotFound, &[]);
        assert!(matches!(err, AppError::DatabaseError(_)));
    }
}
