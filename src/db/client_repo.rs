// src/db/client_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::common::db_utils::{map_db_error, Constraint};
use crate::common::error::AppError;
use crate::db::soft_delete::SoftDeletable;
use crate::models::client::{Client, CreateClientPayload};

const UNIQUE_KEYS: &[Constraint] = &[
    Constraint::new("idx_clients_email_active", "email", "Email já cadastrado"),
    Constraint::new("idx_clients_cpf_active", "cpf", "CPF já cadastrado"),
];

impl SoftDeletable for Client {
    const TABLE: &'static str = "clients";
    const NOT_FOUND: &'static str = "Cliente não encontrado";
    const ORDER_BY: &'static str = "full_name ASC";
    const CONSTRAINTS: &'static [Constraint] = UNIQUE_KEYS;
}

#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, payload: &CreateClientPayload) -> Result<Client, AppError> {
        sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (full_name, email, phone, address, cpf, birth_date, notes, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(payload.full_name.trim())
        .bind(payload.email.trim().to_lowercase())
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(&payload.cpf)
        .bind(payload.birth_date)
        .bind(&payload.notes)
        .bind(payload.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }

    /// Grava o registro já mesclado. Deve rodar na mesma transação do lock.
    pub async fn update<'e, E>(&self, executor: E, client: &Client) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Client>(
            r#"
            UPDATE clients
            SET full_name = $2, email = $3, phone = $4, address = $5, cpf = $6,
                birth_date = $7, notes = $8, is_active = $9, updated_at = NOW()
            WHERE id = $1 AND deleted = false
            RETURNING *
            "#,
        )
        .bind(client.id)
        .bind(&client.full_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(&client.cpf)
        .bind(client.birth_date)
        .bind(&client.notes)
        .bind(client.is_active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, UNIQUE_KEYS))
    }
}
