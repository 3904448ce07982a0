// src/handlers/employees.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::ApiResponse, validation::parse_label},
    config::AppState,
    handlers::{fetch_record, AuditQuery},
    middleware::{
        auth::AuthenticatedUser,
        json::ValidJson,
        rbac::{AdminOnly, CanManageEmployees, RequirePermission, RequireRole, StaffOnly},
    },
    models::employee::{CreateEmployeePayload, EmployeeRole, UpdateEmployeePayload},
};

// GET /employees
pub async fn list_employees(
    State(app_state): State<AppState>,
    _guard: RequireRole<StaffOnly>,
) -> Result<impl IntoResponse, AppError> {
    let employees = app_state.employee_service.records().find_active().await?;
    Ok(Json(ApiResponse::new("Funcionários obtidos com sucesso", employees)))
}

// GET /employees/{id}
pub async fn get_employee(
    State(app_state): State<AppState>,
    _guard: RequireRole<StaffOnly>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let employee = fetch_record(app_state.employee_service.records(), &user, id, &query).await?;
    Ok(Json(ApiResponse::new("Funcionário obtido com sucesso", employee)))
}

// GET /employees/role/{role}
pub async fn list_employees_by_role(
    State(app_state): State<AppState>,
    _guard: RequireRole<StaffOnly>,
    Path(role): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let role: EmployeeRole = parse_label("role", &role)?;
    let employees = app_state.employee_service.find_by_role(role).await?;
    Ok(Json(ApiResponse::new("Funcionários obtidos com sucesso", employees)))
}

// POST /employees
pub async fn create_employee(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageEmployees>,
    ValidJson(payload): ValidJson<CreateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    let employee = app_state.employee_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Funcionário criado com sucesso", employee)),
    ))
}

// PUT /employees/{id}
pub async fn update_employee(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageEmployees>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    let employee = app_state.employee_service.update(id, payload).await?;
    Ok(Json(ApiResponse::new("Funcionário atualizado com sucesso", employee)))
}

// DELETE /employees/{id}
pub async fn delete_employee(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageEmployees>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.employee_service.records().soft_delete(id).await?;
    Ok(Json(ApiResponse::message("Funcionário deletado com sucesso")))
}

// POST /employees/{id}/restore
pub async fn restore_employee(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let employee = app_state.employee_service.records().restore(id).await?;
    Ok(Json(ApiResponse::new("Funcionário restaurado com sucesso", employee)))
}
