// src/handlers/vehicles.rs

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
    models::vehicle::{CreateVehiclePayload, UpdateVehiclePayload},
};

// GET /vehicles
pub async fn list_vehicles(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewClients>,
) -> Result<impl IntoResponse, AppError> {
    let vehicles = app_state.vehicle_service.records().find_active().await?;
    Ok(Json(ApiResponse::new("Veículos obtidos com sucesso", vehicles)))
}

// GET /vehicles/{id}
pub async fn get_vehicle(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewClients>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = fetch_record(app_state.vehicle_service.records(), &user, id, &query).await?;
    Ok(Json(ApiResponse::new("Veículo obtido com sucesso", vehicle)))
}

// GET /vehicles/client/{clientId}
pub async fn list_vehicles_by_client(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewClients>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicles = app_state.vehicle_service.find_by_client(client_id).await?;
    Ok(Json(ApiResponse::new("Veículos do cliente obtidos com sucesso", vehicles)))
}

// GET /vehicles/plate/{licensePlate}
pub async fn get_vehicle_by_plate(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewClients>,
    Path(plate): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.find_by_plate(&plate).await?;
    Ok(Json(ApiResponse::new("Veículo obtido com sucesso", vehicle)))
}

// POST /vehicles
pub async fn create_vehicle(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageClients>,
    ValidJson(payload): ValidJson<CreateVehiclePayload>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Veículo criado com sucesso", vehicle)),
    ))
}

// PUT /vehicles/{id}
pub async fn update_vehicle(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageClients>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateVehiclePayload>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.update(id, payload).await?;
    Ok(Json(ApiResponse::new("Veículo atualizado com sucesso", vehicle)))
}

// DELETE /vehicles/{id}
pub async fn delete_vehicle(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageClients>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.vehicle_service.records().soft_delete(id).await?;
    Ok(Json(ApiResponse::message("Veículo deletado com sucesso")))
}

// POST /vehicles/{id}/restore
pub async fn restore_vehicle(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = app_state.vehicle_service.records().restore(id).await?;
    Ok(Json(ApiResponse::new("Veículo restaurado com sucesso", vehicle)))
}
