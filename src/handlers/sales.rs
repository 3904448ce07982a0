// src/handlers/sales.rs

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
        rbac::{CanManageSales, CanViewSales, RequirePermission},
    },
    models::sale::{CreateSalePayload, DateRangeQuery, SaleStatus, UpdateSalePayload},
};

// GET /sales
pub async fn list_sales(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sale_service.records().find_active().await?;
    Ok(Json(ApiResponse::new("Vendas obtidas com sucesso", sales)))
}

// GET /sales/{id}
pub async fn get_sale(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sale = fetch_record(app_state.sale_service.records(), &user, id, &query).await?;
    Ok(Json(ApiResponse::new("Venda obtida com sucesso", sale)))
}

// GET /sales/status/{status}
pub async fn list_sales_by_status(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    Path(status): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let status: SaleStatus = parse_label("status", &status)?;
    let sales = app_state.sale_service.find_by_status(status).await?;
    Ok(Json(ApiResponse::new("Vendas obtidas com sucesso", sales)))
}

// GET /sales/client/{clientId}
pub async fn list_sales_by_client(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sale_service.find_by_client(client_id).await?;
    Ok(Json(ApiResponse::new("Vendas do cliente obtidas com sucesso", sales)))
}

// GET /sales/date-range?startDate=2024-01-01&endDate=2024-01-31
pub async fn list_sales_by_date_range(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    Query(range): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sales = app_state
        .sale_service
        .find_by_date_range(range.start_date, range.end_date)
        .await?;
    Ok(Json(ApiResponse::new("Vendas por período obtidas com sucesso", sales)))
}

// POST /sales
pub async fn create_sale(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    ValidJson(payload): ValidJson<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Venda criada com sucesso", sale)),
    ))
}

// PUT /sales/{id}
pub async fn update_sale(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    let sale = app_state.sale_service.update(id, payload).await?;
    Ok(Json(ApiResponse::new("Venda atualizada com sucesso", sale)))
}

// DELETE /sales/{id}
pub async fn delete_sale(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sale_service.records().soft_delete(id).await?;
    Ok(Json(ApiResponse::message("Venda deletada com sucesso")))
}
