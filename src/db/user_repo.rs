// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::db_utils::{map_db_error, Constraint};
use crate::common::error::AppError;
use crate::db::soft_delete::{select_active, SoftDeletable};
use crate::models::{auth::User, rbac::UserRole};

const UNIQUE_KEYS: &[Constraint] = &[
    Constraint::new("idx_users_username_active", "username", "Username ou email já cadastrado"),
    Constraint::new("idx_users_email_active", "email", "Username ou email já cadastrado"),
];

impl SoftDeletable for User {
    const TABLE: &'static str = "users";
    const NOT_FOUND: &'static str = "Usuário não encontrado";
    const ORDER_BY: &'static str = "username ASC";
    const CONSTRAINTS: &'static [Constraint] = UNIQUE_KEYS;
}

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca para login: username OU e-mail (sempre em minúsculas), ativo e não excluído
    pub async fn find_for_login(&self, identifier: &str) -> Result<Option<User>, AppError> {
        let sql = select_active(
            User::TABLE,
            Some("is_active = true AND (username = $1 OR email = LOWER($1))"),
            None,
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Cria um novo usuário. Username/e-mail repetidos viram Conflict (409).
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: UserRole,
        employee_id: Option<Uuid>,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, role, employee_id)
            VALUES ($1, LOWER($2), $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(employee_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }

    pub async fn touch_last_login(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1 AND deleted = false",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Grava perfil, papel e ativação de um usuário já carregado com lock.
    pub async fn update<'e, E>(&self, executor: E, user: &User) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, email = LOWER($3), role = $4, employee_id = $5,
                is_active = $6, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.role)
        .bind(user.employee_id)
        .bind(user.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }

    pub async fn has_active_admin(&self) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE role = 'admin' AND is_active = true AND deleted = false)",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
