// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{strong_password, USERNAME_RE};
use crate::models::rbac::{PermissionSet, UserRole};

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: UserRole,
    pub employee_id: Option<Uuid>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,

    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn permissions(&self) -> PermissionSet {
        PermissionSet::for_role(self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Projeção pública do usuário (sem hash, com permissões derivadas).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub permissions: PermissionSet,
    pub employee_id: Option<Uuid>,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            permissions: user.permissions(),
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            employee_id: user.employee_id,
            is_active: user.is_active,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// Dados para login. `username` aceita o username ou o e-mail.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "Username ou email é obrigatório"))]
    pub username: String,
    #[validate(length(min = 1, message = "Senha é obrigatória"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

// Dados para registro de um novo usuário (somente admin)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[validate(
        length(min = 3, max = 50, message = "Username deve ter entre 3 e 50 caracteres"),
        regex(path = *USERNAME_RE, message = "Username deve conter apenas letras, números e underscore")
    )]
    pub username: String,

    #[validate(email(message = "Email inválido"))]
    pub email: String,

    #[validate(custom(function = "strong_password"))]
    pub password: String,

    #[serde(default)]
    pub role: UserRole,

    pub employee_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "Senha atual é obrigatória"))]
    pub current_password: String,

    #[validate(custom(function = "strong_password"))]
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfilePayload {
    #[validate(
        length(min = 3, max = 50, message = "Username deve ter entre 3 e 50 caracteres"),
        regex(path = *USERNAME_RE, message = "Username deve conter apenas letras, números e underscore")
    )]
    pub username: Option<String>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,
}

// Administração de usuários: papel e ativação
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub employee_id: Option<Uuid>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // Subject (ID do usuário)
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub permissions: PermissionSet,
    pub iat: usize, // Issued At
    pub exp: usize, // Expiration time
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: UserRole) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "joao_silva".into(),
            email: "joao@oficina.com".into(),
            password_hash: "$2b$04$hash".into(),
            role,
            employee_id: None,
            is_active: true,
            last_login: None,
            deleted: false,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn public_projection_has_no_hash() {
        let json = serde_json::to_value(PublicUser::from(sample_user(UserRole::Employee))).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["permissions"]["canManageSales"], false);
    }

    #[test]
    fn raw_user_never_serializes_hash() {
        let json = serde_json::to_value(sample_user(UserRole::Admin)).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["role"], "admin");
    }

    #[test]
    fn register_defaults_to_employee_role() {
        let payload: RegisterPayload = serde_json::from_value(serde_json::json!({
            "username": "maria",
            "email": "maria@oficina.com",
            "password": "Senha1"
        }))
        .unwrap();
        assert_eq!(payload.role, UserRole::Employee);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn register_rejects_weak_password_and_bad_username() {
        let payload = RegisterPayload {
            username: "ma ria".into(),
            email: "maria@oficina.com".into(),
            password: "fraca".into(),
            role: UserRole::Employee,
            employee_id: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
    }
}
