// src/handlers/auth.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::{
    common::{error::AppError, response::ApiResponse},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        json::ValidJson,
        rbac::{AdminOnly, RequireRole},
    },
    models::auth::{
        ChangePasswordPayload, LoginPayload, PublicUser, RegisterPayload, UpdateProfilePayload,
        UpdateUserPayload,
    },
};

// POST /auth/login (pública)
pub async fn login(
    State(app_state): State<AppState>,
    ValidJson(payload): ValidJson<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state
        .auth_service
        .login(&payload.username, &payload.password)
        .await?;

    Ok(Json(ApiResponse::new("Login realizado com sucesso", response)))
}

// POST /auth/register
pub async fn register(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    ValidJson(payload): ValidJson<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.auth_service.register(payload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Usuário criado com sucesso", user)),
    ))
}

// GET /auth/profile
pub async fn get_profile(AuthenticatedUser(user): AuthenticatedUser) -> impl IntoResponse {
    Json(ApiResponse::new("Perfil obtido com sucesso", PublicUser::from(user)))
}

// PUT /auth/profile
pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ValidJson(payload): ValidJson<UpdateProfilePayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.auth_service.update_profile(user.id, payload).await?;
    Ok(Json(ApiResponse::new("Perfil atualizado com sucesso", user)))
}

// PUT /auth/change-password
pub async fn change_password(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    ValidJson(payload): ValidJson<ChangePasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .auth_service
        .change_password(user.id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(ApiResponse::message("Senha alterada com sucesso")))
}

// GET /auth/users
pub async fn list_users(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.auth_service.list_users().await?;
    Ok(Json(ApiResponse::new("Usuários obtidos com sucesso", users)))
}

// PUT /auth/users/{id}
pub async fn update_user(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    Path(id): Path<Uuid>,
    ValidJson(payload): ValidJson<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.auth_service.update_user(id, payload).await?;
    Ok(Json(ApiResponse::new("Usuário atualizado com sucesso", user)))
}
