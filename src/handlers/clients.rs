// src/handlers/clients.rs

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
        rbac::{AdminOnly, CanManageClients, CanViewClients, RequirePermission, RequireRole},
    },
    models::client::{CreateClientPayload, UpdateClientPayload},
};

// GET /clients
pub async fn list_clients(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewClients>,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.client_service.records().find_active().await?;
    Ok(Json(ApiResponse::new("Clientes obtidos com sucesso", clients)))
}

// GET /clients/{id}
pub async fn get_client(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewClients>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let client = fetch_record(app_state.client_service.records(), &user, id, &query).await?;
    Ok(Json(ApiResponse::new("Cliente obtido com sucesso", client)))
}

// GET /clients/email/{email}
pub async fn get_client_by_email(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewClients>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.find_by_email(&email).await?;
    Ok(Json(ApiResponse::new("Cliente obtido com sucesso", client)))
}

// GET /clients/cpf/{cpf}
pub async fn get_client_by_cpf(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewClients>,
    Path(cpf): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.find_by_cpf(&cpf).await?;
    Ok(Json(ApiResponse::new("Cliente obtido com sucesso", client)))
}

// POST /clients
pub async fn create_client(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageClients>,
    ValidJson(payload): ValidJson<CreateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Cliente criado com sucesso", client)),
    ))
}

// PUT /clients/{id}
pub async fn update_client(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageClients>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.update(id, payload).await?;
    Ok(Json(ApiResponse::new("Cliente atualizado com sucesso", client)))
}

// DELETE /clients/{id}
pub async fn delete_client(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageClients>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.client_service.records().soft_delete(id).await?;
    Ok(Json(ApiResponse::message("Cliente deletado com sucesso")))
}

// POST /clients/{id}/restore
pub async fn restore_client(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let client = app_state.client_service.records().restore(id).await?;
    Ok(Json(ApiResponse::new("Cliente restaurado com sucesso", client)))
}
