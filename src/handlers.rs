pub mod auth;
pub mod clients;
pub mod employees;
pub mod financials;
pub mod invoices;
pub mod payments;
pub mod products;
pub mod sales;
pub mod services;
pub mod tickets;
pub mod vehicles;

use serde::Deserialize;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{SoftDeletable, SoftDeleteRepository},
    middleware::{auth::AuthenticatedUser, rbac::require_admin},
};

/// `?includeDeleted=true` no detalhe: leitura de auditoria (somente admin).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

/// Detalhe de um registro, respeitando a exclusão lógica salvo em auditoria.
pub(crate) async fn fetch_record<T: SoftDeletable>(
    records: &SoftDeleteRepository<T>,
    user: &AuthenticatedUser,
    id: Uuid,
    query: &AuditQuery,
) -> Result<T, AppError> {
    if !query.include_deleted {
        return records.get(id).await;
    }

    require_admin(user)?;
    records
        .find_by_id_including_deleted(id)
        .await?
        .ok_or_else(|| AppError::NotFound(T::NOT_FOUND.to_string()))
}
