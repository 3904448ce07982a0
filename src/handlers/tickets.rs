// src/handlers/tickets.rs

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
    models::ticket::{CreateTicketPayload, TicketStatus, UpdateTicketPayload},
};

// GET /tickets
pub async fn list_tickets(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
) -> Result<impl IntoResponse, AppError> {
    let tickets = app_state.ticket_service.records().find_active().await?;
    Ok(Json(ApiResponse::new("Tickets obtidos com sucesso", tickets)))
}

// GET /tickets/{id}
pub async fn get_ticket(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<AuditQuery>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = fetch_record(app_state.ticket_service.records(), &user, id, &query).await?;
    Ok(Json(ApiResponse::new("Ticket obtido com sucesso", ticket)))
}

// GET /tickets/status/{status}
pub async fn list_tickets_by_status(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    Path(status): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let status: TicketStatus = parse_label("status", &status)?;
    let tickets = app_state.ticket_service.find_by_status(status).await?;
    Ok(Json(ApiResponse::new("Tickets obtidos com sucesso", tickets)))
}

// GET /tickets/client/{clientId}
pub async fn list_tickets_by_client(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanViewSales>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tickets = app_state.ticket_service.find_by_client(client_id).await?;
    Ok(Json(ApiResponse::new("Tickets do cliente obtidos com sucesso", tickets)))
}

// POST /tickets
pub async fn create_ticket(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    ValidJson(payload): ValidJson<CreateTicketPayload>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = app_state.ticket_service.create(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Ticket criado com sucesso", ticket)),
    ))
}

// PUT /tickets/{id}
pub async fn update_ticket(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateTicketPayload>,
) -> Result<impl IntoResponse, AppError> {
    let ticket = app_state.ticket_service.update(id, payload).await?;
    Ok(Json(ApiResponse::new("Ticket atualizado com sucesso", ticket)))
}

// DELETE /tickets/{id}
pub async fn delete_ticket(
    State(app_state): State<AppState>,
    _guard: RequirePermission<CanManageSales>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.ticket_service.records().soft_delete(id).await?;
    Ok(Json(ApiResponse::message("Ticket deletado com sucesso")))
}
