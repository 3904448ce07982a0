// src/handlers/invoices.rs

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
    models::invoice::{CreateInvoicePayload, InvoiceStatus, UpdateInvoicePayload},
};

// GET /invoices
pub async fn list_invoices(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = app_state.invoice_service.records().find_active().await?;
    Ok(Json(ApiResponse::new("Notas fiscais obtidas com sucesso", invoices)))
}

// GET /invoices/{id}
pub async fn get_invoice(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = fetch_record(app_state.invoice_service.records(), &user, id, &query).await?;
    Ok(Json(ApiResponse::new("Nota fiscal obtida com sucesso", invoice)))
}

// GET /invoices/number/{number}
pub async fn get_invoice_by_number(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    Path(number): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state.invoice_service.find_by_number(&number).await?;
    Ok(Json(ApiResponse::new("Nota fiscal obtida com sucesso", invoice)))
}

// GET /invoices/status/{status}
pub async fn list_invoices_by_status(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    Path(status): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let status: InvoiceStatus = parse_label("status", &status)?;
    let invoices = app_state.invoice_service.find_by_status(status).await?;
    Ok(Json(ApiResponse::new("Notas fiscais obtidas com sucesso", invoices)))
}

// GET /invoices/client/{clientId}
pub async fn list_invoices_by_client(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let invoices = app_state.invoice_service.find_by_client(client_id).await?;
    Ok(Json(ApiResponse::new("Notas fiscais do cliente obtidas com sucesso", invoices)))
}

// POST /invoices
pub async fn create_invoice(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    ValidJson(payload): ValidJson<CreateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state.invoice_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Nota fiscal criada com sucesso", invoice)),
    ))
}

// PUT /invoices/{id}
pub async fn update_invoice(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateInvoicePayload>,
) -> Result<impl IntoResponse, AppError> {
    let invoice = app_state.invoice_service.update(id, payload).await?;
    Ok(Json(ApiResponse::new("Nota fiscal atualizada com sucesso", invoice)))
}

// DELETE /invoices/{id}
pub async fn delete_invoice(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.invoice_service.records().soft_delete(id).await?;
    Ok(Json(ApiResponse::message("Nota fiscal deletada com sucesso")))
}
