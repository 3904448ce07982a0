// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Um erro de validação associado a um campo do payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

// Corpo padrão das respostas de erro: { message, errors? }
#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<FieldError>>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(Vec<FieldError>),

    // Mesmo erro para "usuário não existe" e "senha errada".
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário inativo ou não encontrado")]
    InactiveUser,

    #[error("Senha atual incorreta")]
    CurrentPasswordMismatch,

    #[error("Acesso negado: {0}")]
    Forbidden(String),

    #[error("Não encontrado: {0}")]
    NotFound(String),

    #[error("Violação de unicidade no campo '{field}'")]
    Conflict { field: String, message: String },

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Atalho para um erro de validação em um único campo.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::CurrentPasswordMismatch => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken | AppError::InactiveUser => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_field_errors(None, &errors, &mut fields);
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationError(fields)
    }
}

// Achata os erros do `validator`, incluindo structs e listas aninhadas
// (ex.: "items[0].quantity").
fn collect_field_errors(prefix: Option<&str>, errors: &ValidationErrors, out: &mut Vec<FieldError>) {
    for (field, kind) in errors.errors() {
        let field = camel_case(field);
        let path = match prefix {
            Some(p) => format!("{p}.{field}"),
            None => field,
        };

        match kind {
            ValidationErrorsKind::Field(list) => {
                for err in list {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Valor inválido ({})", err.code));
                    out.push(FieldError { field: path.clone(), message });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(Some(&path), inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(Some(&format!("{path}[{index}]")), inner, out);
                }
            }
        }
    }
}

// Os payloads usam camelCase no JSON; o `validator` reporta o nome Rust.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            AppError::ValidationError(errors) => ErrorBody {
                message: "Um ou mais campos são inválidos.".to_string(),
                errors: Some(errors),
            },
            AppError::InvalidCredentials => ErrorBody {
                message: "Credenciais inválidas".to_string(),
                errors: None,
            },
            AppError::InvalidToken => ErrorBody {
                message: "Token de acesso inválido, expirado ou ausente.".to_string(),
                errors: None,
            },
            AppError::InactiveUser => ErrorBody {
                message: "Usuário inativo ou não encontrado".to_string(),
                errors: None,
            },
            AppError::CurrentPasswordMismatch => ErrorBody {
                message: "Senha atual incorreta".to_string(),
                errors: None,
            },
            AppError::Forbidden(message) | AppError::NotFound(message) => ErrorBody {
                message,
                errors: None,
            },
            AppError::Conflict { field, message } => ErrorBody {
                message: message.clone(),
                errors: Some(vec![FieldError { field, message }]),
            },

            // Banco, bcrypt, JWT e anyhow viram 500. O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                ErrorBody {
                    message: "Ocorreu um erro inesperado.".to_string(),
                    errors: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    async fn body_of(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[derive(Validate)]
    struct Line {
        #[validate(range(min = 1, message = "Quantidade deve ser maior que 0"))]
        quantity: i32,
    }

    #[derive(Validate)]
    struct Order {
        #[validate(length(min = 3, message = "Nome muito curto"))]
        name: String,
        #[validate(nested)]
        items: Vec<Line>,
    }

    #[tokio::test]
    async fn validation_errors_become_field_list() {
        let order = Order {
            name: "ab".into(),
            items: vec![Line { quantity: 2 }, Line { quantity: 0 }],
        };
        let err: AppError = order.validate().unwrap_err().into();

        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0]["field"], "items[1].quantity");
        assert_eq!(errors[1]["field"], "name");
        assert_eq!(errors[1]["message"], "Nome muito curto");
    }

    #[test]
    fn field_names_follow_json_casing() {
        assert_eq!(camel_case("license_plate"), "licensePlate");
        assert_eq!(camel_case("items"), "items");
        assert_eq!(camel_case("unit_price"), "unitPrice");
    }

    #[tokio::test]
    async fn invalid_credentials_body_is_generic() {
        let (status, body) = body_of(AppError::InvalidCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({ "message": "Credenciais inválidas" }));
    }

    #[tokio::test]
    async fn conflict_names_the_field() {
        let err = AppError::Conflict {
            field: "email".into(),
            message: "Este e-mail já está em uso.".into(),
        };
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "Este e-mail já está em uso.");
        assert_eq!(body["errors"][0]["field"], "email");
    }

    #[tokio::test]
    async fn internal_errors_are_sanitized() {
        let err = AppError::InternalServerError(anyhow::anyhow!("conexão recusada em 10.0.0.3"));
        let (status, body) = body_of(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Ocorreu um erro inesperado.");
        assert!(body.get("errors").is_none());
    }
}
