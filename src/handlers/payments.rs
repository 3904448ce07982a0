// src/handlers/payments.rs

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
    models::payment::{CreatePaymentPayload, PaymentStatus, UpdatePaymentPayload},
};

// GET /payments
pub async fn list_payments(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state.payment_service.records().find_active().await?;
    Ok(Json(ApiResponse::new("Pagamentos obtidos com sucesso", payments)))
}

// GET /payments/{id}
pub async fn get_payment(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let payment = fetch_record(app_state.payment_service.records(), &user, id, &query).await?;
    Ok(Json(ApiResponse::new("Pagamento obtido com sucesso", payment)))
}

// GET /payments/status/{status}
pub async fn list_payments_by_status(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    Path(status): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let status: PaymentStatus = parse_label("status", &status)?;
    let payments = app_state.payment_service.find_by_status(status).await?;
    Ok(Json(ApiResponse::new("Pagamentos obtidos com sucesso", payments)))
}

// GET /payments/client/{clientId}
pub async fn list_payments_by_client(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state.payment_service.find_by_client(client_id).await?;
    Ok(Json(ApiResponse::new("Pagamentos do cliente obtidos com sucesso", payments)))
}

// GET /payments/service/{serviceId}
pub async fn list_payments_by_service(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    Path(service_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state.payment_service.find_by_service(service_id).await?;
    Ok(Json(ApiResponse::new("Pagamentos do serviço obtidos com sucesso", payments)))
}

// POST /payments
pub async fn create_payment(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    ValidJson(payload): ValidJson<CreatePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let payment = app_state.payment_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Pagamento criado com sucesso", payment)),
    ))
}

// PUT /payments/{id}
pub async fn update_payment(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdatePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let payment = app_state.payment_service.update(id, payload).await?;
    Ok(Json(ApiResponse::new("Pagamento atualizado com sucesso", payment)))
}

// DELETE /payments/{id}
pub async fn delete_payment(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.payment_service.records().soft_delete(id).await?;
    Ok(Json(ApiResponse::message("Pagamento deletado com sucesso")))
}
