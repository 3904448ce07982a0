// src/db/soft_delete.rs

use std::marker::PhantomData;

use sqlx::{postgres::PgRow, Encode, Executor, FromRow, PgPool, Postgres, Type};
use uuid::Uuid;

use crate::common::db_utils::{map_db_error, Constraint};
use crate::common::error::AppError;

/// Entidade persistida com exclusão lógica (`deleted` / `deleted_at`).
pub trait SoftDeletable: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    /// Mensagem do 404 ("Cliente não encontrado").
    const NOT_FOUND: &'static str;
    const ORDER_BY: &'static str = "created_at DESC";
    /// Índices únicos que podem colidir em um restore.
    const CONSTRAINTS: &'static [Constraint] = &[];
}

// =============================================================================
//  CONSTRUÇÃO DO SQL
// =============================================================================

/// SELECT de registros ativos. O filtro `deleted = false` é sempre aplicado.
pub fn select_active(table: &str, filter: Option<&str>, order_by: Option<&str>) -> String {
    let mut sql = format!("SELECT * FROM {table} WHERE deleted = false");
    if let Some(f) = filter {
        sql.push_str(" AND (");
        sql.push_str(f);
        sql.push(')');
    }
    if let Some(o) = order_by {
        sql.push_str(" ORDER BY ");
        sql.push_str(o);
    }
    sql
}

fn soft_delete_sql(table: &str) -> String {
    format!(
        "UPDATE {table} SET deleted = true, deleted_at = NOW(), updated_at = NOW() \
         WHERE id = $1 AND deleted = false"
    )
}

fn restore_sql(table: &str) -> String {
    format!(
        "UPDATE {table} SET deleted = false, deleted_at = NULL, updated_at = NOW() \
         WHERE id = $1 AND deleted = true RETURNING *"
    )
}

// =============================================================================
//  REPOSITÓRIO GENÉRICO
// =============================================================================

/// Leitura, exclusão lógica e restauração de qualquer tabela `SoftDeletable`.
/// Nenhum método daqui devolve registros excluídos, exceto
/// `find_by_id_including_deleted` (auditoria).
pub struct SoftDeleteRepository<T> {
    pool: PgPool,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for SoftDeleteRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: SoftDeletable> SoftDeleteRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    pub async fn find_active(&self) -> Result<Vec<T>, AppError> {
        let sql = select_active(T::TABLE, None, Some(T::ORDER_BY));
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Lista ativos onde `column = value`. A coluna é sempre um literal do código.
    pub async fn find_active_by<V>(&self, column: &'static str, value: V) -> Result<Vec<T>, AppError>
    where
        V: for<'q> Encode<'q, Postgres> + Type<Postgres> + Send + 'static,
    {
        let filter = format!("{column} = $1");
        let sql = select_active(T::TABLE, Some(&filter), Some(T::ORDER_BY));
        let rows = sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_one_active_by<V>(&self, column: &'static str, value: V) -> Result<Option<T>, AppError>
    where
        V: for<'q> Encode<'q, Postgres> + Type<Postgres> + Send + 'static,
    {
        let filter = format!("{column} = $1");
        let sql = select_active(T::TABLE, Some(&filter), None);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, AppError> {
        self.find_one_active_by("id", id).await
    }

    /// Como `find_by_id`, mas 404 quando não existe registro ativo.
    pub async fn get(&self, id: Uuid) -> Result<T, AppError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(T::NOT_FOUND.to_string()))
    }

    /// Leitura de auditoria: ignora o filtro de exclusão lógica.
    pub async fn find_by_id_including_deleted(&self, id: Uuid) -> Result<Option<T>, AppError> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", T::TABLE);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Carrega o registro ativo com lock de linha. Usar dentro de uma transação.
    pub async fn find_by_id_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<T, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} FOR UPDATE", select_active(T::TABLE, Some("id = $1"), None));
        sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::NotFound(T::NOT_FOUND.to_string()))
    }

    /// Marca como excluído. Registro inexistente ou já excluído -> 404.
    pub async fn soft_delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(&soft_delete_sql(T::TABLE))
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(T::NOT_FOUND.to_string()));
        }

        tracing::info!(table = T::TABLE, %id, "Registro excluído (lógico)");
        Ok(())
    }

    /// Desfaz a exclusão lógica. Só encontra registros excluídos.
    pub async fn restore(&self, id: Uuid) -> Result<T, AppError> {
        let row = sqlx::query_as::<_, T>(&restore_sql(T::TABLE))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error(e, T::CONSTRAINTS))?
            .ok_or_else(|| AppError::NotFound(T::NOT_FOUND.to_string()))?;

        tracing::info!(table = T::TABLE, %id, "Registro restaurado");
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_select_always_filters_deleted() {
        assert_eq!(
            select_active("clients", None, None),
            "SELECT * FROM clients WHERE deleted = false"
        );
        assert_eq!(
            select_active("vehicles", Some("client_id = $1"), Some("created_at DESC")),
            "SELECT * FROM vehicles WHERE deleted = false AND (client_id = $1) ORDER BY created_at DESC"
        );
    }

    #[test]
    fn caller_filter_cannot_escape_deleted_guard() {
        let sql = select_active("clients", Some("true OR deleted = true"), None);
        assert!(sql.contains("WHERE deleted = false AND (true OR deleted = true)"));
    }

    #[test]
    fn soft_delete_only_touches_active_rows() {
        let sql = soft_delete_sql("sales");
        assert!(sql.contains("SET deleted = true, deleted_at = NOW()"));
        assert!(sql.ends_with("WHERE id = $1 AND deleted = false"));
    }

    #[test]
    fn restore_only_touches_deleted_rows() {
        let sql = restore_sql("products");
        assert!(sql.contains("deleted = false, deleted_at = NULL"));
        assert!(sql.contains("WHERE id = $1 AND deleted = true"));
    }
}
