// src/handlers/services.rs
//
// Catálogo de serviços (/services).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    handlers::{fetch_record, AuditQuery},
    middleware::{
        auth::AuthenticatedUser,
        json::ValidJson,
        rbac::{AdminOnly, CanManageProducts, CanViewProducts, RequirePermission, RequireRole},
    },
    models::service::{CreateServicePayload, UpdateServicePayload},
};

// GET /services
pub async fn list_services(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewProducts>,
) -> Result<impl IntoResponse, AppError> {
    let services = app_state.catalog_service.records().find_active().await?;
    Ok(Json(ApiResponse::new("Serviços obtidos com sucesso", services)))
}

// GET /services/{id}
pub async fn get_service(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewProducts>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let service = fetch_record(app_state.catalog_service.records(), &user, id, &query).await?;
    Ok(Json(ApiResponse::new("Serviço obtido com sucesso", service)))
}

// POST /services
pub async fn create_service(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageProducts>,
    ValidJson(payload): ValidJson<CreateServicePayload>,
) -> Result<impl IntoResponse, AppError> {
    let service = app_state.catalog_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Serviço criado com sucesso", service)),
    ))
}

// PUT /services/{id}
pub async fn update_service(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageProducts>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateServicePayload>,
) -> Result<impl IntoResponse, AppError> {
    let service = app_state.catalog_service.update(id, payload).await?;
    Ok(Json(ApiResponse::new("Serviço atualizado com sucesso", service)))
}

// DELETE /services/{id}
pub async fn delete_service(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageProducts>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.records().soft_delete(id).await?;
    Ok(Json(ApiResponse::message("Serviço deletado com sucesso")))
}

// POST /services/{id}/restore
pub async fn restore_service(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let service = app_state.catalog_service.records().restore(id).await?;
    Ok(Json(ApiResponse::new("Serviço restaurado com sucesso", service)))
}
