// src/handlers/products.rs

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
    models::product::{CreateProductPayload, StockMovementPayload, UpdateProductPayload},
};

// GET /products
pub async fn list_products(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewProducts>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.records().find_active().await?;
    Ok(Json(ApiResponse::new("Produtos obtidos com sucesso", products)))
}

// GET /products/{id}
pub async fn get_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewProducts>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let product = fetch_record(app_state.product_service.records(), &user, id, &query).await?;
    Ok(Json(ApiResponse::new("Produto obtido com sucesso", product)))
}

// POST /products
pub async fn create_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageProducts>,
    ValidJson(payload): ValidJson<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Produto criado com sucesso", product)),
    ))
}

// PUT /products/{id}
pub async fn update_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageProducts>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.update(id, payload).await?;
    Ok(Json(ApiResponse::new("Produto atualizado com sucesso", product)))
}

// POST /products/{id}/movements
pub async fn add_stock_movement(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageProducts>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<StockMovementPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.add_movement(id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Movimentação registrada com sucesso", product)),
    ))
}

// DELETE /products/{id}
pub async fn delete_product(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageProducts>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.records().soft_delete(id).await?;
    Ok(Json(ApiResponse::message("Produto deletado com sucesso")))
}

// POST /products/{id}/restore
pub async fn restore_product(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.product_service.records().restore(id).await?;
    Ok(Json(ApiResponse::new("Produto restaurado com sucesso", product)))
}
