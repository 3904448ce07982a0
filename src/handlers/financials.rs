// src/handlers/financials.rs

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
        rbac::{AdminOnly, CanViewFinancials, CanViewReports, RequirePermission, RequireRole},
    },
    models::financial::{CreateFinancialPayload, FinancialStatus, UpdateFinancialPayload},
};

// GET /financials
pub async fn list_financials(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewFinancials>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.financial_service.records().find_active().await?;
    Ok(Json(ApiResponse::new("Lançamentos obtidos com sucesso", entries)))
}

// GET /financials/{id}
pub async fn get_financial(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewFinancials>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entry = fetch_record(app_state.financial_service.records(), &user, id, &query).await?;
    Ok(Json(ApiResponse::new("Lançamento obtido com sucesso", entry)))
}

// GET /financials/status/{status}
pub async fn list_financials_by_status(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewFinancials>,
    Path(status): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let status: FinancialStatus = parse_label("status", &status)?;
    let entries = app_state.financial_service.find_by_status(status).await?;
    Ok(Json(ApiResponse::new("Lançamentos obtidos com sucesso", entries)))
}

// GET /financials/report/{year}/{month}
pub async fn monthly_report(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewReports>,
    Path((year, month)): Path<(i32, u32)>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.financial_service.monthly_report(year, month).await?;
    Ok(Json(ApiResponse::new("Relatório mensal obtido com sucesso", report)))
}

// POST /financials
pub async fn create_financial(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    _guard: RequirePermission<CanViewFinancials>,
    ValidJson(payload): ValidJson<CreateFinancialPayload>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state.financial_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Lançamento criado com sucesso", entry)),
    ))
}

// PUT /financials/{id}
pub async fn update_financial(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    _guard: RequirePermission<CanViewFinancials>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateFinancialPayload>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state.financial_service.update(id, payload).await?;
    Ok(Json(ApiResponse::new("Lançamento atualizado com sucesso", entry)))
}

// DELETE /financials/{id}
pub async fn delete_financial(
    State(app_state): State<AppState>,
    _admin: RequireRole<AdminOnly>,
    _guard: RequirePermission<CanViewFinancials>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.financial_service.records().soft_delete(id).await?;
    Ok(Json(ApiResponse::message("Lançamento deletado com sucesso")))
}
